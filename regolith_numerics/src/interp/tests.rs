/////////////////////////////////////////////////////////////////////////////////////////////
//
// Tests the interpolator across schemes, policies, derivatives, and integration.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use super::*;
use approx::assert_relative_eq;

fn uniform_grid(n: usize, a: f64, b: f64) -> Vec<f64> {
    (0..n)
        .map(|i| a + (b - a) * i as f64 / (n - 1) as f64)
        .collect()
}

fn sampled<F: Fn(f64) -> f64>(scheme: InterpScheme, x: &[f64], f: F) -> Interpolator {
    let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();
    Interpolator::with_data(scheme, x, &y).unwrap()
}

#[test]
fn linear_scheme_is_exact_for_linear_functions() {
    let x = uniform_grid(6, 0.0, 5.0);
    let mut interp = sampled(InterpScheme::Linear, &x, |v| 4.0 * v - 7.0);
    for &a in &[0.3, 1.5, 2.2, 4.9] {
        assert_relative_eq!(
            interp.evaluate(a, Extrapolation::Error).unwrap(),
            4.0 * a - 7.0,
            max_relative = 1e-9
        );
    }
}

#[test]
fn cubic_schemes_are_exact_for_cubics() {
    let f = |v: f64| v * v * v - 3.0 * v;
    let fp = |v: f64| 3.0 * v * v - 3.0;
    let x = uniform_grid(9, -2.0, 2.0);

    let mut clamped = sampled(InterpScheme::CubicClamped, &x, f);
    clamped
        .set_clamped_endpoint_derivs(fp(-2.0), fp(2.0))
        .unwrap();
    for &a in &[-1.7, -0.4, 0.9, 1.95] {
        assert_relative_eq!(
            clamped.evaluate(a, Extrapolation::Error).unwrap(),
            f(a),
            epsilon = 1e-9
        );
    }

    // the global polynomial through cubic samples is that cubic
    let mut poly = sampled(InterpScheme::Polynomial, &x, f);
    let mut neville = sampled(InterpScheme::PolynomialNeville, &x, f);
    for &a in &[-1.1, 0.25, 1.6] {
        assert_relative_eq!(
            poly.evaluate(a, Extrapolation::Error).unwrap(),
            f(a),
            epsilon = 1e-8
        );
        assert_relative_eq!(
            neville.evaluate(a, Extrapolation::Error).unwrap(),
            f(a),
            epsilon = 1e-8
        );
    }
}

#[test]
fn hermite_scheme_is_exact_for_cubics() {
    let f = |v: f64| 2.0 * v * v * v + v * v - 5.0;
    let fp = |v: f64| 6.0 * v * v + 2.0 * v;
    let x = uniform_grid(5, 0.0, 4.0);
    let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();
    let derivs: Vec<f64> = x.iter().map(|&v| fp(v)).collect();
    let mut interp = Interpolator::with_data(InterpScheme::CubicHermite, &x, &y).unwrap();
    interp.add_hermite_derivs(&derivs).unwrap();
    for &a in &[0.5, 1.8, 3.3] {
        assert_relative_eq!(
            interp.evaluate(a, Extrapolation::Error).unwrap(),
            f(a),
            epsilon = 1e-9
        );
        assert_relative_eq!(interp.hermite_first_derivative(a).unwrap(), fp(a), epsilon = 1e-9);
        assert_relative_eq!(
            interp.hermite_second_derivative(a).unwrap(),
            12.0 * a + 2.0,
            epsilon = 1e-8
        );
    }
}

#[test]
fn neighborhood_and_akima_interpolate_the_knots() {
    let x = uniform_grid(8, 0.0, 7.0);
    let y = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 5.5, 7.0];
    for scheme in [InterpScheme::CubicNeighborhood, InterpScheme::Akima] {
        let mut interp = Interpolator::with_data(scheme, &x, &y).unwrap();
        for (i, &xi) in x.iter().enumerate() {
            assert_relative_eq!(
                interp.evaluate(xi, Extrapolation::Error).unwrap(),
                y[i],
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn periodic_cubic_requires_wrapped_values() {
    let x = uniform_grid(5, 0.0, 4.0);
    let y = [1.0, 2.0, 3.0, 2.0, 9.0];
    let mut interp = Interpolator::with_data(InterpScheme::CubicNatPeriodic, &x, &y).unwrap();
    assert!(matches!(
        interp.evaluate(1.0, Extrapolation::Error),
        Err(NumericsError::InvalidArgument { .. })
    ));

    let y = [1.0, 2.0, 3.0, 2.0, 1.0];
    let mut interp = Interpolator::with_data(InterpScheme::CubicNatPeriodic, &x, &y).unwrap();
    assert_relative_eq!(
        interp.evaluate(0.0, Extrapolation::Error).unwrap(),
        1.0,
        epsilon = 1e-12
    );
}

#[test]
fn evaluation_is_idempotent() {
    let x = uniform_grid(12, 0.0, 11.0);
    let mut interp = sampled(InterpScheme::CubicNatural, &x, |v| (0.7 * v).sin());
    let first = interp.evaluate(4.321, Extrapolation::Error).unwrap();
    let second = interp.evaluate(4.321, Extrapolation::Error).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn too_few_points_is_reported_at_evaluation() {
    let mut interp = Interpolator::new(InterpScheme::Akima);
    interp.add_points(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]).unwrap();
    assert!(matches!(
        interp.evaluate(1.5, Extrapolation::Error),
        Err(NumericsError::InvalidArgument { .. })
    ));
    // one more point satisfies the five-point minimum
    interp.add_point(4.0, 4.0);
    assert!(interp.evaluate(1.5, Extrapolation::Error).is_ok());
}

#[test]
fn duplicate_and_unsorted_data_are_rejected() {
    let mut dup = Interpolator::new(InterpScheme::Linear);
    dup.add_points(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap();
    assert!(dup.evaluate(0.5, Extrapolation::Error).is_err());

    let mut unsorted = Interpolator::new(InterpScheme::Linear);
    unsorted.add_points(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).unwrap();
    assert!(unsorted.evaluate(0.5, Extrapolation::Error).is_err());

    // Neville tolerates unsorted data
    let mut neville = Interpolator::new(InterpScheme::PolynomialNeville);
    neville
        .add_points(&[2.0, 0.0, 1.0], &[4.0, 0.0, 1.0])
        .unwrap();
    assert_relative_eq!(
        neville.evaluate(1.5, Extrapolation::Error).unwrap(),
        2.25,
        epsilon = 1e-10
    );
}

#[test]
fn mismatched_batch_lengths_are_rejected() {
    let mut interp = Interpolator::new(InterpScheme::Linear);
    assert!(interp.add_points(&[0.0, 1.0], &[0.0]).is_err());
}

#[test]
fn extrapolation_policies() {
    let x = uniform_grid(6, 0.0, 5.0);
    let f = |v: f64| v * v;

    let mut linear = sampled(InterpScheme::Linear, &x, f);
    assert!(matches!(
        linear.evaluate(6.0, Extrapolation::Error),
        Err(NumericsError::OutOfDomain { .. })
    ));
    // clamping evaluates at the endpoint
    assert_relative_eq!(
        linear
            .evaluate(6.0, Extrapolation::NearestEndpoint)
            .unwrap(),
        25.0,
        epsilon = 1e-12
    );
    // linear silently degrades Extrapolate to clamping
    assert_relative_eq!(
        linear.evaluate(6.0, Extrapolation::Extrapolate).unwrap(),
        25.0,
        epsilon = 1e-12
    );

    // the clamped cubic genuinely extrapolates
    let mut clamped = sampled(InterpScheme::CubicClamped, &x, f);
    clamped.set_clamped_endpoint_derivs(0.0, 10.0).unwrap();
    let outside = clamped.evaluate(5.5, Extrapolation::Extrapolate).unwrap();
    assert_relative_eq!(outside, 5.5 * 5.5, max_relative = 1e-2);

    // the local neighborhood refuses
    let x7 = uniform_grid(7, 0.0, 6.0);
    let mut neighborhood = sampled(InterpScheme::CubicNeighborhood, &x7, f);
    assert!(matches!(
        neighborhood.evaluate(6.5, Extrapolation::Extrapolate),
        Err(NumericsError::OutOfDomain { .. })
    ));
    assert!(neighborhood
        .evaluate(6.5, Extrapolation::NearestEndpoint)
        .is_ok());
}

#[test]
fn neville_error_estimates_accumulate_per_batch() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let mut interp = sampled(InterpScheme::PolynomialNeville, &x, |v| v * v);
    assert!(interp.neville_error_estimates().is_err());

    interp.evaluate(0.5, Extrapolation::Error).unwrap();
    assert_eq!(interp.neville_error_estimates().unwrap().len(), 1);

    interp
        .evaluate_many(&[0.5, 1.5, 2.5], Extrapolation::Error)
        .unwrap();
    let errs = interp.neville_error_estimates().unwrap();
    assert_eq!(errs.len(), 3);
    for e in errs {
        assert!(e.abs() < 1e-9);
    }
}

#[test]
fn finite_differences_approximate_known_derivatives() {
    let f = |v: f64| v * v * v;
    let x = uniform_grid(201, 0.0, 2.0);
    let mut interp = sampled(InterpScheme::CubicNatural, &x, f);
    let a = 1.0;
    let h = 0.01;

    assert_relative_eq!(
        interp.center_first_difference(a, 5, h).unwrap(),
        3.0,
        max_relative = 1e-4
    );
    assert_relative_eq!(
        interp.forward_first_difference(a, 3, h).unwrap(),
        3.0,
        max_relative = 1e-3
    );
    assert_relative_eq!(
        interp.backward_first_difference(a, 2, h).unwrap(),
        3.0,
        max_relative = 1e-2
    );
    assert_relative_eq!(
        interp.center_second_difference(a, 3, h).unwrap(),
        6.0,
        max_relative = 1e-3
    );
}

#[test]
fn finite_difference_stencils_respect_the_domain() {
    let x = uniform_grid(11, 0.0, 1.0);
    let mut interp = sampled(InterpScheme::CubicNatural, &x, |v| v);
    // stencil reaches below zero
    assert!(matches!(
        interp.backward_first_difference(0.05, 3, 0.1),
        Err(NumericsError::OutOfDomain { .. })
    ));
    // unsupported stencil size
    assert!(matches!(
        interp.center_first_difference(0.5, 4, 0.01),
        Err(NumericsError::InvalidArgument { .. })
    ));
}

#[test]
fn newton_cotes_rules_integrate_smooth_data() {
    let f = |v: f64| v * v;
    let x = uniform_grid(21, 0.0, 2.0);
    let exact = 8.0 / 3.0;

    let mut interp = sampled(InterpScheme::CubicNatural, &x, f);
    assert_relative_eq!(interp.trapezoid_integral(0.0, 2.0).unwrap(), exact, max_relative = 1e-3);
    assert_relative_eq!(
        interp.simpson_3point_integral(0.0, 2.0).unwrap(),
        exact,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        interp.simpson_4point_integral(0.0, 2.0).unwrap(),
        exact,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        interp.booles_rule_integral(0.0, 2.0).unwrap(),
        exact,
        max_relative = 1e-8
    );
}

#[test]
fn romberg_round_trip_recovers_the_analytic_integral() {
    // integral of sin over [0, pi] is 2; density tightens the recovery
    for (n, tol) in [(31, 1e-4), (101, 1e-6)] {
        let x = uniform_grid(n, 0.0, std::f64::consts::PI);
        let mut interp = sampled(InterpScheme::CubicNatural, &x, f64::sin);
        let v = interp.romberg_integral(0.0, std::f64::consts::PI).unwrap();
        assert_relative_eq!(v, 2.0, max_relative = tol);
    }
}

#[test]
fn integration_limits_are_checked() {
    let x = uniform_grid(11, 0.0, 1.0);
    let mut interp = sampled(InterpScheme::Linear, &x, |v| v);
    assert!(interp.trapezoid_integral(0.5, 0.25).is_err());
    assert!(interp.trapezoid_integral(-0.5, 0.5).is_err());
}

#[test]
fn set_scheme_keeps_data_and_revalidates() {
    let x = uniform_grid(6, 0.0, 5.0);
    let mut interp = sampled(InterpScheme::Linear, &x, |v| 2.0 * v);
    assert!(interp.evaluate(2.5, Extrapolation::Error).is_ok());
    interp.set_scheme(InterpScheme::CubicNatural);
    assert_eq!(interp.len(), 6);
    assert_relative_eq!(
        interp.evaluate(2.5, Extrapolation::Error).unwrap(),
        5.0,
        epsilon = 1e-9
    );
}

#[test]
fn adding_data_invalidates_clamped_endpoint_derivs() {
    let x = uniform_grid(5, 0.0, 4.0);
    let mut interp = sampled(InterpScheme::CubicClamped, &x, |v| v);
    interp.set_clamped_endpoint_derivs(1.0, 1.0).unwrap();
    assert!(interp.evaluate(2.0, Extrapolation::Error).is_ok());
    interp.add_point(5.0, 5.0);
    // endpoint derivatives must be supplied again for the new data
    assert!(matches!(
        interp.evaluate(2.0, Extrapolation::Error),
        Err(NumericsError::InvalidArgument { .. })
    ));
}

#[test]
fn clamped_second_derivative_table_matches_natural_sentinel() {
    let x = uniform_grid(6, 0.0, 5.0);
    let mut clamped = sampled(InterpScheme::CubicClamped, &x, |v| v * v);
    // sentinel magnitude selects natural boundaries
    clamped.set_clamped_endpoint_derivs(1.0e30, 1.0e30).unwrap();
    let d2 = clamped.clamped_second_derivatives().unwrap();
    assert_relative_eq!(d2[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(d2[d2.len() - 1], 0.0, epsilon = 1e-12);
}
