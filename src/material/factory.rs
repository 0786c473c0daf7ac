use super::{DruckerPrager, Elastic, Encapsulated, InitStrain, InitStress, InitialStateNd, Inverted};
use super::{LinearElasticNd, Parallel, PathIndependent, Plastic1d, Series, TensionOnly, VonMises};
use super::{LinearHardening, LinearSoftening, PerfectPlastic, PyHyperbolic, VoceHardening};
use super::{StressStrainTrait, UniaxialTrait};
use crate::base::{Buffer, Channel, Idealization, MatError, MaterialKind, ParamNd, ParamUniaxial, Settings};

/// Allocates a uniaxial material
///
/// Composite parameters are constructed deeply: every member or owned material is a new,
/// independent instance sharing the tag of the composite.
pub fn new_uniaxial(tag: usize, param: &ParamUniaxial, settings: &Settings) -> Result<Box<dyn UniaxialTrait>, MatError> {
    let material: Box<dyn UniaxialTrait> = match param {
        ParamUniaxial::Elastic { young, eta } => Box::new(Elastic::new(tag, *young, *eta)?),
        ParamUniaxial::TensionOnly { young, capacity } => Box::new(TensionOnly::new(tag, *young, *capacity)?),
        ParamUniaxial::ElasticPerfectlyPlastic { young, fy_pos, fy_neg } => {
            let hardening = PerfectPlastic {
                fy_pos: *fy_pos,
                fy_neg: *fy_neg,
            };
            Box::new(Plastic1d::new(tag, *young, hardening, settings)?)
        }
        ParamUniaxial::LinearHardening {
            young,
            sigma_y,
            h_iso,
            h_kin,
        } => {
            let hardening = LinearHardening {
                sigma_y: *sigma_y,
                h_iso: *h_iso,
                h_kin: *h_kin,
            };
            Box::new(Plastic1d::new(tag, *young, hardening, settings)?)
        }
        ParamUniaxial::VoceHardening {
            young,
            sigma_y,
            sigma_inf,
            delta,
            h_iso,
            h_kin,
        } => {
            let hardening = VoceHardening {
                sigma_y: *sigma_y,
                sigma_inf: *sigma_inf,
                delta: *delta,
                h_iso: *h_iso,
                h_kin: *h_kin,
            };
            Box::new(Plastic1d::new(tag, *young, hardening, settings)?)
        }
        ParamUniaxial::LinearSoftening {
            young,
            sigma_y,
            h_soft,
            sigma_res,
        } => {
            let hardening = LinearSoftening {
                sigma_y: *sigma_y,
                h_soft: *h_soft,
                sigma_res: *sigma_res,
            };
            Box::new(Plastic1d::new(tag, *young, hardening, settings)?)
        }
        ParamUniaxial::PySoil {
            p_ult,
            y50,
            c_elastic,
            c_yield,
        } => Box::new(Plastic1d::py_soil(tag, *p_ult, *y50, *c_elastic, *c_yield, settings)?),
        ParamUniaxial::Encapsulated { inner } => Box::new(Encapsulated::new(tag, new_uniaxial(tag, inner, settings)?)),
        ParamUniaxial::Inverted { inner } => Box::new(Inverted::new(tag, new_uniaxial(tag, inner, settings)?)),
        ParamUniaxial::PathIndependent { inner } => {
            Box::new(PathIndependent::new(tag, new_uniaxial(tag, inner, settings)?))
        }
        ParamUniaxial::InitStrain { inner, eps0 } => {
            Box::new(InitStrain::new(tag, new_uniaxial(tag, inner, settings)?, *eps0)?)
        }
        ParamUniaxial::InitStress { inner, sig0 } => {
            Box::new(InitStress::new(tag, new_uniaxial(tag, inner, settings)?, *sig0, settings)?)
        }
        ParamUniaxial::Parallel { members, factors } => {
            let members = new_members(tag, members, settings)?;
            Box::new(Parallel::new(tag, members, factors.clone())?)
        }
        ParamUniaxial::Series { members } => {
            let members = new_members(tag, members, settings)?;
            Box::new(Series::new(tag, members, settings)?)
        }
    };
    Ok(material)
}

/// Allocates an n-dimensional stress-strain material
pub fn new_nd(
    tag: usize,
    ideal: &Idealization,
    param: &ParamNd,
    settings: &Settings,
) -> Result<Box<dyn StressStrainTrait>, MatError> {
    let material: Box<dyn StressStrainTrait> = match param {
        ParamNd::LinearElastic { young, poisson } => Box::new(LinearElasticNd::new(tag, ideal, *young, *poisson)?),
        ParamNd::VonMises {
            young,
            poisson,
            z0,
            hh,
            hk,
            z_inf,
            delta,
        } => Box::new(VonMises::new(
            tag, ideal, *young, *poisson, *z0, *hh, *hk, *z_inf, *delta, settings,
        )?),
        ParamNd::DruckerPrager {
            young,
            poisson,
            c,
            phi,
            psi,
            hh,
        } => Box::new(DruckerPrager::new(
            tag, ideal, *young, *poisson, *c, *phi, *psi, *hh, settings,
        )?),
        ParamNd::InitialState { inner } => Box::new(InitialStateNd::new(tag, new_nd(tag, ideal, inner, settings)?)),
    };
    Ok(material)
}

fn new_members(
    tag: usize,
    params: &[ParamUniaxial],
    settings: &Settings,
) -> Result<Vec<Box<dyn UniaxialTrait>>, MatError> {
    params.iter().map(|param| new_uniaxial(tag, param, settings)).collect()
}

/// Writes the type code, the tag and the data of a uniaxial material
pub fn pack_uniaxial(material: &dyn UniaxialTrait, buffer: &mut Buffer) -> Result<(), MatError> {
    buffer.push_usize(material.kind().code());
    buffer.push_usize(material.tag());
    material.send_data(buffer)
}

/// Reconstructs any uniaxial material written by [pack_uniaxial]
pub fn receive_uniaxial(buffer: &mut Buffer) -> Result<Box<dyn UniaxialTrait>, MatError> {
    let (kind, tag) = pull_header(buffer)?;
    let material: Box<dyn UniaxialTrait> = match kind {
        MaterialKind::Elastic => Box::new(Elastic::receive_data(tag, buffer)?),
        MaterialKind::TensionOnly => Box::new(TensionOnly::receive_data(tag, buffer)?),
        MaterialKind::PerfectPlastic => Box::new(Plastic1d::<PerfectPlastic>::receive_data(tag, buffer)?),
        MaterialKind::LinearHardening => Box::new(Plastic1d::<LinearHardening>::receive_data(tag, buffer)?),
        MaterialKind::VoceHardening => Box::new(Plastic1d::<VoceHardening>::receive_data(tag, buffer)?),
        MaterialKind::LinearSoftening => Box::new(Plastic1d::<LinearSoftening>::receive_data(tag, buffer)?),
        MaterialKind::PyHyperbolic => Box::new(Plastic1d::<PyHyperbolic>::receive_data(tag, buffer)?),
        MaterialKind::Encapsulated => Box::new(Encapsulated::receive_data(tag, buffer)?),
        MaterialKind::Inverted => Box::new(Inverted::receive_data(tag, buffer)?),
        MaterialKind::PathIndependent => Box::new(PathIndependent::receive_data(tag, buffer)?),
        MaterialKind::InitStrain => Box::new(InitStrain::receive_data(tag, buffer)?),
        MaterialKind::InitStress => Box::new(InitStress::receive_data(tag, buffer)?),
        MaterialKind::Parallel => Box::new(Parallel::receive_data(tag, buffer)?),
        MaterialKind::Series => Box::new(Series::receive_data(tag, buffer)?),
        _ => return Err(MatError::UnknownType(format!("{} is not a uniaxial material", kind.name()))),
    };
    Ok(material)
}

/// Writes the type code, the tag, the strain order and the data of an n-dimensional material
pub fn pack_nd(material: &dyn StressStrainTrait, buffer: &mut Buffer) -> Result<(), MatError> {
    buffer.push_usize(material.kind().code());
    buffer.push_usize(material.tag());
    buffer.push_usize(material.order());
    material.send_data(buffer)
}

/// Reconstructs any n-dimensional material written by [pack_nd]
pub fn receive_nd(buffer: &mut Buffer) -> Result<Box<dyn StressStrainTrait>, MatError> {
    let (kind, tag) = pull_header(buffer)?;
    let to_err = MatError::marshal(tag, "receive_nd");
    let order = buffer.pull_usize().map_err(&to_err)?;
    let ideal = Idealization::from_order(order).map_err(&to_err)?;
    let material: Box<dyn StressStrainTrait> = match kind {
        MaterialKind::LinearElasticNd => Box::new(LinearElasticNd::receive_data(tag, &ideal, buffer)?),
        MaterialKind::VonMises => Box::new(VonMises::receive_data(tag, &ideal, buffer)?),
        MaterialKind::DruckerPrager => Box::new(DruckerPrager::receive_data(tag, &ideal, buffer)?),
        MaterialKind::InitialStateNd => Box::new(InitialStateNd::receive_data(tag, ideal.mandel(), buffer)?),
        _ => return Err(MatError::UnknownType(format!("{} is not an n-dimensional material", kind.name()))),
    };
    Ok(material)
}

fn pull_header(buffer: &mut Buffer) -> Result<(MaterialKind, usize), MatError> {
    let to_err = MatError::marshal(0, "receive");
    let code = buffer.pull_usize().map_err(&to_err)?;
    let tag = buffer.pull_usize().map_err(&to_err)?;
    match MaterialKind::from_code(code) {
        Some(kind) => Ok((kind, tag)),
        None => Err(MatError::UnknownType(format!("type code {}", code))),
    }
}

/// Sends a uniaxial material as one packet
pub fn send_uniaxial(material: &dyn UniaxialTrait, channel: &mut dyn Channel) -> Result<(), MatError> {
    let mut buffer = Buffer::new();
    pack_uniaxial(material, &mut buffer)?;
    channel
        .send_values(buffer.as_data())
        .map_err(MatError::marshal(material.tag(), "send"))
}

/// Receives a uniaxial material from one packet
pub fn recv_uniaxial(channel: &mut dyn Channel) -> Result<Box<dyn UniaxialTrait>, MatError> {
    let mut buffer = recv_packet(channel)?;
    let material = receive_uniaxial(&mut buffer)?;
    check_consumed(material.tag(), &buffer)?;
    Ok(material)
}

/// Sends an n-dimensional material as one packet
pub fn send_nd(material: &dyn StressStrainTrait, channel: &mut dyn Channel) -> Result<(), MatError> {
    let mut buffer = Buffer::new();
    pack_nd(material, &mut buffer)?;
    channel
        .send_values(buffer.as_data())
        .map_err(MatError::marshal(material.tag(), "send"))
}

/// Receives an n-dimensional material from one packet
pub fn recv_nd(channel: &mut dyn Channel) -> Result<Box<dyn StressStrainTrait>, MatError> {
    let mut buffer = recv_packet(channel)?;
    let material = receive_nd(&mut buffer)?;
    check_consumed(material.tag(), &buffer)?;
    Ok(material)
}

fn recv_packet(channel: &mut dyn Channel) -> Result<Buffer, MatError> {
    let values = channel.recv_values().map_err(MatError::marshal(0, "recv"))?;
    Ok(Buffer::from_vec(values))
}

fn check_consumed(tag: usize, buffer: &Buffer) -> Result<(), MatError> {
    if buffer.remaining() != 0 {
        return Err(MatError::Marshal {
            tag,
            operation: "recv",
            reason: "the packet has trailing values",
        });
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{new_nd, new_uniaxial, pack_nd, pack_uniaxial, receive_nd, receive_uniaxial};
    use super::{recv_nd, recv_uniaxial, send_nd, send_uniaxial};
    use crate::base::{Buffer, Channel, Idealization, MatError, MaterialKind, MemoryChannel};
    use crate::base::{ParamNd, ParamUniaxial, Settings};
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn new_uniaxial_captures_errors() {
        let settings = Settings::new();
        let param = ParamUniaxial::Inverted {
            inner: Box::new(ParamUniaxial::Elastic { young: -1.0, eta: 0.0 }),
        };
        assert_eq!(
            new_uniaxial(7, &param, &settings).err(),
            Some(MatError::Config {
                tag: 7,
                reason: "young must be > 0.0"
            })
        );
        let param = ParamUniaxial::Series { members: Vec::new() };
        assert_eq!(
            new_uniaxial(8, &param, &settings).err(),
            Some(MatError::Config {
                tag: 8,
                reason: "at least one member is required"
            })
        );
    }

    #[test]
    fn new_uniaxial_builds_independent_members() {
        let settings = Settings::new();
        let member = ParamUniaxial::ElasticPerfectlyPlastic {
            young: 200.0,
            fy_pos: 1.0,
            fy_neg: 1.0,
        };
        let param = ParamUniaxial::Parallel {
            members: vec![member.clone(), member],
            factors: Some(vec![1.0, 2.0]),
        };
        let mut material = new_uniaxial(1, &param, &settings).unwrap();
        assert_eq!(material.kind(), MaterialKind::Parallel);
        material.set_trial_strain(0.001, 0.0).unwrap();
        approx_eq(material.stress(), 0.6, 1e-15);
        material.set_trial_strain(0.01, 0.0).unwrap();
        approx_eq(material.stress(), 3.0, 1e-15);
        approx_eq(material.tangent(), 0.0, 1e-15);
    }

    #[test]
    fn new_nd_works() {
        let settings = Settings::new();
        let ideal = Idealization::new(3);
        let param = ParamNd::InitialState {
            inner: Box::new(ParamNd::VonMises {
                young: 1500.0,
                poisson: 0.25,
                z0: 9.0,
                hh: 800.0,
                hk: 0.0,
                z_inf: 0.0,
                delta: 0.0,
            }),
        };
        let material = new_nd(3, &ideal, &param, &settings).unwrap();
        assert_eq!(material.kind(), MaterialKind::InitialStateNd);
        assert_eq!(material.order(), 6);
        let mut ideal = Idealization::new(2);
        ideal.set_plane_stress(true).unwrap();
        let param = ParamNd::DruckerPrager {
            young: 1000.0,
            poisson: 0.25,
            c: 10.0,
            phi: 30.0,
            psi: 30.0,
            hh: 0.0,
        };
        assert_eq!(
            new_nd(4, &ideal, &param, &settings).err(),
            Some(MatError::Config {
                tag: 4,
                reason: "Drucker-Prager model does not work in plane-stress"
            })
        );
    }

    #[test]
    fn receive_captures_errors() {
        let mut buffer = Buffer::from_vec(vec![1000.0, 1.0]);
        assert_eq!(
            receive_uniaxial(&mut buffer).err(),
            Some(MatError::UnknownType("type code 1000".to_string()))
        );
        let mut buffer = Buffer::from_vec(vec![40.0, 1.0, 4.0]);
        assert_eq!(
            receive_uniaxial(&mut buffer).err(),
            Some(MatError::UnknownType(
                "ElasticIsotropic is not a uniaxial material".to_string()
            ))
        );
        let mut buffer = Buffer::from_vec(vec![40.0, 1.0, 5.0]);
        assert_eq!(
            receive_nd(&mut buffer).err(),
            Some(MatError::Marshal {
                tag: 1,
                operation: "receive_nd",
                reason: "order must be 4 (2D) or 6 (3D)"
            })
        );
        let mut buffer = Buffer::from_vec(vec![1.0, 1.0, 1000.0]);
        assert!(receive_uniaxial(&mut buffer).is_err());
    }

    #[test]
    fn pack_and_receive_work() {
        let settings = Settings::new();
        let param = ParamUniaxial::Series {
            members: vec![
                ParamUniaxial::Elastic { young: 100.0, eta: 0.0 },
                ParamUniaxial::InitStrain {
                    inner: Box::new(ParamUniaxial::LinearHardening {
                        young: 100.0,
                        sigma_y: 1.0,
                        h_iso: 10.0,
                        h_kin: 0.0,
                    }),
                    eps0: 0.001,
                },
            ],
        };
        let mut material = new_uniaxial(2, &param, &settings).unwrap();
        material.set_trial_strain(0.05, 0.0).unwrap();
        material.commit_state().unwrap();
        let mut buffer = Buffer::new();
        pack_uniaxial(material.as_ref(), &mut buffer).unwrap();
        let mut received = receive_uniaxial(&mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(received.kind(), MaterialKind::Series);
        assert_eq!(received.stress(), material.stress());
        material.set_trial_strain(0.04, 0.0).unwrap();
        received.set_trial_strain(0.04, 0.0).unwrap();
        approx_eq(received.stress(), material.stress(), 1e-14);

        let ideal = Idealization::new(2);
        let param = ParamNd::LinearElastic {
            young: 1000.0,
            poisson: 0.25,
        };
        let mut material = new_nd(5, &ideal, &param, &settings).unwrap();
        material.set_trial_strain(&Vector::from(&[0.001, 0.0, 0.0, 0.0])).unwrap();
        material.commit_state().unwrap();
        let mut buffer = Buffer::new();
        pack_nd(material.as_ref(), &mut buffer).unwrap();
        let received = receive_nd(&mut buffer).unwrap();
        assert_eq!(received.tag(), 5);
        assert_eq!(received.stress().vector()[0], material.stress().vector()[0]);
    }

    #[test]
    fn channel_exchange_works() {
        let settings = Settings::new();
        let mut channel = MemoryChannel::new();
        let param = ParamUniaxial::ElasticPerfectlyPlastic {
            young: 200000.0,
            fy_pos: 400.0,
            fy_neg: 400.0,
        };
        let mut material = new_uniaxial(9, &param, &settings).unwrap();
        material.set_trial_strain(0.003, 0.0).unwrap();
        material.commit_state().unwrap();
        send_uniaxial(material.as_ref(), &mut channel).unwrap();
        assert_eq!(channel.pending(), 1);
        let mut received = recv_uniaxial(&mut channel).unwrap();
        received.set_trial_strain(0.0025, 0.0).unwrap();
        approx_eq(received.stress(), 300.0, 1e-10);
        assert_eq!(
            recv_uniaxial(&mut channel).err(),
            Some(MatError::Marshal {
                tag: 0,
                operation: "recv",
                reason: "channel has no pending packets"
            })
        );

        let ideal = Idealization::new(3);
        let param = ParamNd::LinearElastic {
            young: 1000.0,
            poisson: 0.25,
        };
        let material = new_nd(1, &ideal, &param, &settings).unwrap();
        send_nd(material.as_ref(), &mut channel).unwrap();
        let received = recv_nd(&mut channel).unwrap();
        assert_eq!(received.order(), 6);

        // trailing values are rejected
        let mut buffer = Buffer::new();
        pack_uniaxial(&*new_uniaxial(1, &param_elastic(), &settings).unwrap(), &mut buffer).unwrap();
        let mut values = buffer.as_data().to_vec();
        values.push(0.0);
        channel.send_values(&values).unwrap();
        assert_eq!(
            recv_uniaxial(&mut channel).err(),
            Some(MatError::Marshal {
                tag: 1,
                operation: "recv",
                reason: "the packet has trailing values"
            })
        );
    }

    fn param_elastic() -> ParamUniaxial {
        ParamUniaxial::Elastic { young: 10.0, eta: 0.0 }
    }
}
