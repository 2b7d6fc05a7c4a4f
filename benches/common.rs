#![allow(dead_code)]

use std::f64::consts::{PI, E};

// Test integrals on bounded intervals with known values.

fn f1(x: f64) -> f64 { x.exp() }

fn f2<const N: i32>(x: f64) -> f64 { x.powi(N) }

fn f3(x: f64) -> f64 { 1. / (1. + x * x) }

fn f4(x: f64) -> f64 { x.sqrt() }

fn f5(x: f64) -> f64 { 1. / ((x - 0.3).powi(2) + 0.01) }

fn f6<const N: i32>(x: f64) -> f64 { (N as f64 * x).sin().powi(2) }

fn f7(x: f64) -> f64 { x.ln() }

fn f8(x: f64) -> f64 { 1. / x.sqrt() }

fn f9(x: f64) -> f64 { x.ln() / x.sqrt() }

fn f10(x: f64) -> f64 { x.powf(-0.9) }

/// A test problem: ∫ `f` on \[`a`, `b`\] = `exact`.  `singular` says
/// whether `f` is infinite at one of the bounds.
#[derive(Clone, Copy)]
pub struct Problem {
    pub f: fn(f64) -> f64,
    pub a: f64,
    pub b: f64,
    pub exact: f64,
    pub singular: bool,
}

/// Return the list of test problems.
#[inline]
pub fn test_problems() -> Vec<Problem> {
    macro_rules! p {
        ($f: expr, $a: expr, $b: expr, $exact: expr) => {
            Problem { f: $f as fn(f64) -> f64, a: $a, b: $b,
                      exact: $exact, singular: false }
        };
        ($f: expr, $a: expr, $b: expr, $exact: expr, singular) => {
            Problem { f: $f as fn(f64) -> f64, a: $a, b: $b,
                      exact: $exact, singular: true }
        };
    }
    vec![p!(f1, 0., 1., E - 1.),
         p!(f2::<5>, 0., 1., 1. / 6.),
         p!(f2::<20>, 0., 1., 1. / 21.),
         p!(f3, 0., 1., PI / 4.),
         p!(f4, 0., 1., 2. / 3.),
         p!(f5, 0., 1., 10. * (7f64.atan() + 3f64.atan())),
         p!(f6::<10>, 0., PI, PI / 2.),
         p!(f6::<50>, 0., PI, PI / 2.),
         p!(f7, 0., 1., -1., singular),
         p!(f8, 0., 1., 2., singular),
         p!(f9, 0., 1., -4., singular),
         p!(f10, 0., 1., 10., singular),
    ]
}

/// Composite Simpson rule with `n` (even) panels.
pub fn simpson(f: fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let h = (b - a) / n as f64;
    let mut s = f(a) + f(b);
    for i in 1..n {
        let w = if i % 2 == 1 { 4. } else { 2. };
        s += w * f(a + i as f64 * h);
    }
    s * h / 3.
}

/// Integrand of the weighted problem, without its weight
/// (2.2 - x)^(5/6).
pub fn weighted_integrand(x: f64) -> f64 {
    4. * (0.5 * x).cos() * (-1.25 * x).exp()
        + 2. * (4.5 * x).sin() * (x / 8.).exp()
        + 2.
}
