use super::UniaxialTrait;
use crate::base::MatError;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds the output of one step of a strain path
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct PathRecord {
    /// Strain ε
    pub strain: f64,

    /// Strain rate dε/dt
    pub strain_rate: f64,

    /// Stress σ
    pub stress: f64,

    /// Tangent modulus dσ/dε
    pub tangent: f64,
}

/// Holds a sequence of strain states driving uniaxial materials
///
/// Each state is applied as a trial strain and then committed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StrainPath {
    /// Holds the strain states
    pub strains: Vec<f64>,

    /// Holds the (pseudo) time increment used to compute strain rates
    ///
    /// A zero value renders zero strain rates.
    pub time_step: f64,
}

impl StrainPath {
    /// Allocates a new instance from a list of strain states
    pub fn new(strains: &[f64]) -> Self {
        StrainPath {
            strains: strains.to_vec(),
            time_step: 0.0,
        }
    }

    /// Allocates a path that linearly interpolates between peaks, starting at zero
    ///
    /// # Input
    ///
    /// * `peaks` -- the strain values reached at the end of each segment
    /// * `steps` -- number of increments of each segment
    pub fn new_segments(peaks: &[f64], steps: usize) -> Result<Self, StrError> {
        if steps < 1 {
            return Err("steps must be ≥ 1");
        }
        let mut strains = Vec::with_capacity(peaks.len() * steps);
        let mut start = 0.0;
        for peak in peaks {
            for i in 1..(steps + 1) {
                strains.push(start + (peak - start) * (i as f64) / (steps as f64));
            }
            start = *peak;
        }
        Ok(StrainPath {
            strains,
            time_step: 0.0,
        })
    }

    /// Sets the time increment used to compute strain rates
    pub fn set_time_step(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 {
            return Err("time_step must be ≥ 0.0");
        }
        self.time_step = value;
        Ok(self)
    }

    /// Appends a strain state
    pub fn push(&mut self, strain: f64) -> &mut Self {
        self.strains.push(strain);
        self
    }

    /// Drives a material along the path, committing every step
    ///
    /// The strain rate is computed against the strain of the material before each step.
    pub fn follow(&self, material: &mut dyn UniaxialTrait) -> Result<Vec<PathRecord>, MatError> {
        let mut records = Vec::with_capacity(self.strains.len());
        for strain in &self.strains {
            let strain_rate = if self.time_step > 0.0 {
                (strain - material.strain()) / self.time_step
            } else {
                0.0
            };
            material.set_trial_strain(*strain, strain_rate)?;
            material.commit_state()?;
            records.push(PathRecord {
                strain: *strain,
                strain_rate,
                stress: material.stress(),
                tangent: material.tangent(),
            });
        }
        Ok(records)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::StrainPath;
    use crate::material::{Elastic, PerfectPlastic, Plastic1d};
    use crate::base::Settings;
    use russell_lab::approx_eq;

    #[test]
    fn new_segments_works() {
        assert_eq!(StrainPath::new_segments(&[1.0], 0).err(), Some("steps must be ≥ 1"));
        let path = StrainPath::new_segments(&[1.0, -1.0], 2).unwrap();
        assert_eq!(path.strains, &[0.5, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn follow_works() {
        let settings = Settings::new();
        let hardening = PerfectPlastic {
            fy_pos: 400.0,
            fy_neg: 400.0,
        };
        let mut material = Plastic1d::new(1, 200000.0, hardening, &settings).unwrap();
        let mut path = StrainPath::new(&[0.0015, 0.003]);
        path.push(0.0025);
        let records = path.follow(&mut material).unwrap();
        assert_eq!(records.len(), 3);
        approx_eq(records[0].stress, 300.0, 1e-10);
        approx_eq(records[1].stress, 400.0, 1e-10);
        approx_eq(records[1].tangent, 0.0, 1e-10);
        approx_eq(records[2].stress, 300.0, 1e-10);
        approx_eq(records[2].tangent, 200000.0, 1e-10);
    }

    #[test]
    fn strain_rate_works() {
        let mut material = Elastic::new(1, 100.0, 10.0).unwrap();
        let mut path = StrainPath::new(&[0.01, 0.03]);
        assert_eq!(path.set_time_step(-1.0).err(), Some("time_step must be ≥ 0.0"));
        path.set_time_step(0.5).unwrap();
        let records = path.follow(&mut material).unwrap();
        approx_eq(records[0].strain_rate, 0.02, 1e-15);
        approx_eq(records[1].strain_rate, 0.04, 1e-15);
        // σ = E ε + η dε/dt
        approx_eq(records[1].stress, 100.0 * 0.03 + 10.0 * 0.04, 1e-14);
    }
}
