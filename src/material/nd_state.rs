use crate::base::Buffer;
use crate::StrError;
use russell_lab::Vector;
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Holds the state of the n-dimensional elastoplastic laws
#[derive(Clone, Debug)]
pub(crate) struct NdState {
    /// Total strain ε
    pub strain: Tensor2,

    /// Stress σ
    pub stress: Tensor2,

    /// Consistent tangent D
    pub tangent: Tensor4,

    /// Plastic strain εp
    pub eps_p: Tensor2,

    /// Back stress β (kinematic hardening)
    pub back: Tensor2,

    /// Accumulated plastic strain
    pub alpha: f64,

    /// Plastic multiplier of the last update
    pub dgamma: f64,

    /// Indicates that the last update involved plastic flow
    pub loading: bool,

    /// Indicates a return to the apex (pressure dependent laws)
    pub apex: bool,

    /// Indicates that all values are finite
    pub finite: bool,
}

impl NdState {
    /// Allocates a virgin state with the elastic tangent
    pub fn new(mandel: Mandel, dd_elastic: &Tensor4) -> Self {
        let mut tangent = Tensor4::new(mandel);
        tangent.set_tensor(1.0, dd_elastic);
        NdState {
            strain: Tensor2::new(mandel),
            stress: Tensor2::new(mandel),
            tangent,
            eps_p: Tensor2::new(mandel),
            back: Tensor2::new(mandel),
            alpha: 0.0,
            dgamma: 0.0,
            loading: false,
            apex: false,
            finite: true,
        }
    }

    /// Appends the state to a marshaling buffer
    pub fn write(&self, buffer: &mut Buffer) {
        write_tensor2(&self.strain, buffer);
        write_tensor2(&self.stress, buffer);
        let n = self.stress.vector().dim();
        let mat = self.tangent.matrix();
        for i in 0..n {
            for j in 0..n {
                buffer.push(mat.get(i, j));
            }
        }
        write_tensor2(&self.eps_p, buffer);
        write_tensor2(&self.back, buffer);
        buffer.push(self.alpha);
        buffer.push(self.dgamma);
        buffer.push_bool(self.loading);
        buffer.push_bool(self.apex);
    }

    /// Reads the state from a marshaling buffer
    pub fn read(mandel: Mandel, buffer: &mut Buffer) -> Result<Self, StrError> {
        let n = mandel.dim();
        let mut state = NdState::new(mandel, &Tensor4::new(mandel));
        read_tensor2(&mut state.strain, buffer)?;
        read_tensor2(&mut state.stress, buffer)?;
        let mat = state.tangent.matrix_mut();
        for i in 0..n {
            for j in 0..n {
                mat.set(i, j, buffer.pull()?);
            }
        }
        read_tensor2(&mut state.eps_p, buffer)?;
        read_tensor2(&mut state.back, buffer)?;
        state.alpha = buffer.pull()?;
        state.dgamma = buffer.pull()?;
        state.loading = buffer.pull_bool()?;
        state.apex = buffer.pull_bool()?;
        Ok(state)
    }
}

/// Appends the Mandel components of a second-order tensor to a buffer
pub(crate) fn write_tensor2(tt: &Tensor2, buffer: &mut Buffer) {
    let vec = tt.vector();
    for i in 0..vec.dim() {
        buffer.push(vec[i]);
    }
}

/// Reads the Mandel components of a second-order tensor from a buffer
pub(crate) fn read_tensor2(tt: &mut Tensor2, buffer: &mut Buffer) -> Result<(), StrError> {
    let vec = tt.vector_mut();
    for i in 0..vec.dim() {
        vec[i] = buffer.pull()?;
    }
    Ok(())
}

/// Copies the Mandel components of a strain vector into a tensor
pub(crate) fn copy_strain(dest: &mut Tensor2, strain: &Vector) {
    let vec = dest.vector_mut();
    for i in 0..vec.dim() {
        vec[i] = strain[i];
    }
}

/// Indicates that all components of a tensor are finite
pub(crate) fn all_finite(tt: &Tensor2) -> bool {
    let vec = tt.vector();
    (0..vec.dim()).all(|i| vec[i].is_finite())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{all_finite, copy_strain, read_tensor2, write_tensor2, NdState};
    use crate::base::Buffer;
    use russell_lab::Vector;
    use russell_tensor::{LinElasticity, Mandel, Tensor2};

    #[test]
    fn copy_strain_and_all_finite_work() {
        let mut eps = Tensor2::new(Mandel::Symmetric2D);
        copy_strain(&mut eps, &Vector::from(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(eps.vector().as_data(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(all_finite(&eps));
        eps.vector_mut()[3] = f64::NAN;
        assert!(!all_finite(&eps));
    }

    #[test]
    fn tensor_marshaling_works() {
        let mut sig = Tensor2::new(Mandel::Symmetric2D);
        sig.vector_mut()[0] = -1.0;
        sig.vector_mut()[3] = 2.0;
        let mut buffer = Buffer::new();
        write_tensor2(&sig, &mut buffer);
        assert_eq!(buffer.as_data(), &[-1.0, 0.0, 0.0, 2.0]);
        let mut read = Tensor2::new(Mandel::Symmetric2D);
        read_tensor2(&mut read, &mut buffer).unwrap();
        assert_eq!(read.vector().as_data(), sig.vector().as_data());
        assert_eq!(read_tensor2(&mut read, &mut buffer).err(), Some("buffer is exhausted"));
    }

    #[test]
    fn write_and_read_work() {
        let lin = LinElasticity::new(1500.0, 0.25, false, false);
        let mut state = NdState::new(Mandel::Symmetric, lin.get_modulus());
        state.stress.vector_mut()[5] = 7.0;
        state.alpha = 0.5;
        state.apex = true;
        let mut buffer = Buffer::new();
        state.write(&mut buffer);
        assert_eq!(buffer.len(), 6 * 4 + 36 + 4);
        let read = NdState::read(Mandel::Symmetric, &mut buffer).unwrap();
        assert_eq!(read.stress.vector()[5], 7.0);
        assert_eq!(read.tangent.matrix().get(0, 1), state.tangent.matrix().get(0, 1));
        assert_eq!(read.alpha, 0.5);
        assert_eq!(read.apex, true);
        assert_eq!(read.loading, false);
    }
}
