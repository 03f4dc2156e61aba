//! Groth16 verification on BN254 (§4.6): IC-length check, then delegation
//! to `ark_groth16`'s pairing check, matching the reference equation
//! `e(A,B)·e(-α,β)·e(-vkX,γ)·e(-C,δ) = 1`.

use crate::error::{Error, ParseError, VerificationError};
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey};

/// Verify `proof` against `vk` and `public_signals`. Rejects a length
/// mismatch between `vk`'s IC vector and the public-signal count before any
/// group operation (§4.6); the pairing check itself — input commitment,
/// negation, and the four-pair product — is delegated to `ark_groth16`.
pub fn verify(vk: &VerifyingKey<Bn254>, proof: &Proof<Bn254>, public_signals: &[Fr]) -> Result<(), Error> {
    let expected = public_signals.len() + 1;
    if vk.gamma_abc_g1.len() != expected {
        let err = ParseError::IcLengthMismatch {
            ic_len: vk.gamma_abc_g1.len(),
            signal_count: public_signals.len(),
            expected,
        };
        log::debug!("verifier rejected: {err}");
        return Err(err.into());
    }

    let pvk = PreparedVerifyingKey::from(vk.clone());
    let accepted = Groth16::<Bn254>::verify_proof(&pvk, proof, public_signals)
        .map_err(anyhow::Error::from)?;

    if accepted {
        Ok(())
    } else {
        log::debug!("verifier rejected: {}", VerificationError::Rejected);
        Err(VerificationError::Rejected.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_groth16::Groth16 as Groth16Snark;
    use ark_relations::lc;
    use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
    use ark_snark::SNARK;
    use ark_std::rand::SeedableRng;
    use ark_std::UniformRand;

    struct Cubic {
        x: Option<Fr>,
    }

    impl ConstraintSynthesizer<Fr> for Cubic {
        fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
            let x = cs.new_witness_variable(|| self.x.ok_or(SynthesisError::AssignmentMissing))?;
            let x_sq = cs.new_witness_variable(|| {
                self.x.map(|x| x * x).ok_or(SynthesisError::AssignmentMissing)
            })?;
            let out = cs.new_input_variable(|| {
                self.x.map(|x| x * x * x).ok_or(SynthesisError::AssignmentMissing)
            })?;
            cs.enforce_constraint(lc!() + x, lc!() + x, lc!() + x_sq)?;
            cs.enforce_constraint(lc!() + x_sq, lc!() + x, lc!() + out)?;
            Ok(())
        }
    }

    #[test]
    fn accepts_valid_proof_and_rejects_tampered_one() {
        let mut rng = ark_std::rand::rngs::StdRng::seed_from_u64(42);
        let (pk, vk) = Groth16Snark::<Bn254>::circuit_specific_setup(Cubic { x: None }, &mut rng).unwrap();

        let x = Fr::rand(&mut rng);
        let proof = Groth16Snark::<Bn254>::prove(&pk, Cubic { x: Some(x) }, &mut rng).unwrap();
        let public_signals = vec![x * x * x];

        verify(&vk, &proof, &public_signals).expect("valid proof must verify");

        let wrong_signals = vec![x * x];
        let err = verify(&vk, &proof, &wrong_signals).unwrap_err();
        assert!(matches!(err, Error::Verification(VerificationError::Rejected)));
    }

    #[test]
    fn rejects_ic_length_mismatch_before_pairing() {
        let mut rng = ark_std::rand::rngs::StdRng::seed_from_u64(7);
        let (pk, vk) = Groth16Snark::<Bn254>::circuit_specific_setup(Cubic { x: None }, &mut rng).unwrap();
        let x = Fr::rand(&mut rng);
        let proof = Groth16Snark::<Bn254>::prove(&pk, Cubic { x: Some(x) }, &mut rng).unwrap();

        let err = verify(&vk, &proof, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::IcLengthMismatch { .. })
        ));
    }
}
