use matsim::prelude::*;
use russell_lab::approx_eq;

// Parallel and series compositions of plastic members
//
// TEST GOAL
//
// Verifies that parallel members share the strain and add their stresses and
// tangents, and that series members share the stress and add their strains.
//
// CONFIGURATION AND PARAMETERS
//
// * member A: elastic perfectly-plastic, E = 1000, σy = 10
// * member B: linear hardening, E = 2000, σy = 20, H = 200

fn member_a() -> ParamUniaxial {
    ParamUniaxial::ElasticPerfectlyPlastic {
        young: 1000.0,
        fy_pos: 10.0,
        fy_neg: 10.0,
    }
}

fn member_b() -> ParamUniaxial {
    ParamUniaxial::LinearHardening {
        young: 2000.0,
        sigma_y: 20.0,
        h_iso: 200.0,
        h_kin: 0.0,
    }
}

#[test]
fn test_parallel_additivity() -> Result<(), MatError> {
    let settings = Settings::new();
    let param = ParamUniaxial::Parallel {
        members: vec![member_a(), member_b()],
        factors: None,
    };
    let mut parallel = new_uniaxial(1, &param, &settings)?;
    let mut a = new_uniaxial(2, &member_a(), &settings)?;
    let mut b = new_uniaxial(3, &member_b(), &settings)?;
    approx_eq(parallel.initial_tangent(), 3000.0, 1e-15);
    for strain in [0.005, 0.02, 0.03, 0.01, -0.02] {
        parallel.set_trial_strain(strain, 0.0)?;
        a.set_trial_strain(strain, 0.0)?;
        b.set_trial_strain(strain, 0.0)?;
        approx_eq(parallel.stress(), a.stress() + b.stress(), 1e-10);
        approx_eq(parallel.tangent(), a.tangent() + b.tangent(), 1e-8);
        parallel.commit_state()?;
        a.commit_state()?;
        b.commit_state()?;
    }
    Ok(())
}

#[test]
fn test_series_compatibility() -> Result<(), MatError> {
    let settings = Settings::new();
    let param = ParamUniaxial::Series {
        members: vec![member_a(), member_b()],
    };
    let mut series = new_uniaxial(1, &param, &settings)?;
    approx_eq(series.initial_tangent(), 1.0 / (1.0 / 1000.0 + 1.0 / 2000.0), 1e-12);

    // elastic: strains split according to the compliances
    series.set_trial_strain(0.003, 0.0)?;
    approx_eq(series.stress(), 2.0, 1e-9);

    // member A yields first at σ = 10; member B stays elastic (σ/E = 0.005)
    series.set_trial_strain(0.05, 0.0)?;
    approx_eq(series.stress(), 10.0, 1e-8);
    series.commit_state()?;

    // unloading is elastic
    series.set_trial_strain(0.049, 0.0)?;
    approx_eq(series.stress(), 10.0 - 0.001 * (1.0 / (1.0 / 1000.0 + 1.0 / 2000.0)), 1e-8);
    Ok(())
}

#[test]
fn test_series_of_plastic_members_shares_the_stress() -> Result<(), MatError> {
    let settings = Settings::new();
    let member = ParamUniaxial::LinearHardening {
        young: 1000.0,
        sigma_y: 10.0,
        h_iso: 100.0,
        h_kin: 0.0,
    };
    let param = ParamUniaxial::Series {
        members: vec![member.clone(), member.clone()],
    };
    let mut series = new_uniaxial(1, &param, &settings)?;
    let mut single = new_uniaxial(2, &member, &settings)?;
    for strain in [0.02, 0.06, 0.0, -0.04] {
        // identical members carry half of the strain each
        series.set_trial_strain(strain, 0.0)?;
        single.set_trial_strain(strain / 2.0, 0.0)?;
        approx_eq(series.stress(), single.stress(), 1e-8);
        approx_eq(series.tangent(), single.tangent() / 2.0, 1e-6);
        series.commit_state()?;
        single.commit_state()?;
    }
    Ok(())
}
