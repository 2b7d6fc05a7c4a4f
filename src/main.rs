//! Integrate f(x) = 4 cos(x/2) e^(-5x/4) + 2 sin(4.5x) e^(x/8) + 2
//! on \[1.3, 2.2\], plainly and against the weight (2.2 - x)^(5/6).
//!
//! The two results are printed on standard output.  A comparison with
//! the elementary rules is logged on standard error (filtered by
//! `RUST_LOG`, default `info`).

use std::error::Error;
use quad1d::{qags, qaws, rules::Rule};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const A: f64 = 1.3;
const B: f64 = 2.2;
const ALPHA: f64 = 0.;
const BETA: f64 = 5. / 6.;

/// ∫ f(x) dx on \[A, B\].
const REFERENCE: f64 = 3.0765665777241504;

fn f(x: f64) -> f64 {
    4. * (0.5 * x).cos() * (-1.25 * x).exp()
        + 2. * (4.5 * x).sin() * (x / 8.).exp()
        + 2.
}

/// Format `x` with `precision` significant digits the way Python's
/// `format(x, ".{precision}")` does: fixed notation when the decimal
/// exponent is in \[-4, precision - 1), scientific otherwise, trailing
/// zeros removed but at least one digit after the point in fixed
/// notation, and a signed exponent of at least two digits.
fn general(x: f64, precision: usize) -> String {
    if x == 0. {
        return if x.is_sign_negative() { "-0.0".into() } else { "0.0".into() }
    }
    if !x.is_finite() {
        return x.to_string().to_lowercase()
    }
    let p = precision.max(1);
    // The exponent after rounding to `p` digits.
    let sci = format!("{:.*e}", p - 1, x);
    let (mantissa, exp) = split_exponent(&sci);
    if -4 <= exp && exp < p as i32 - 1 {
        let decimals = (p as i32 - 1 - exp) as usize;
        let s = format!("{:.*}", decimals, x);
        let s = if s.contains('.') { s.trim_end_matches('0') } else { &s };
        if s.ends_with('.') { format!("{s}0") } else { s.to_string() }
    } else {
        let m = if mantissa.contains('.') {
            mantissa.trim_end_matches('0').trim_end_matches('.')
        } else {
            mantissa
        };
        format!("{m}e{}", c_exponent(exp))
    }
}

/// Split Rust's `{:e}` output into mantissa and exponent.
fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci, 0),
    }
}

/// Exponent with a sign and at least two digits, as C prints it.
fn c_exponent(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{sign}{:02}", exp.abs())
}

/// Format `x` as C's `%.{decimals}e` does.
fn scientific(x: f64, decimals: usize) -> String {
    if !x.is_finite() {
        return x.to_string().to_lowercase()
    }
    let sci = format!("{:.*e}", decimals, x);
    let (mantissa, exp) = split_exponent(&sci);
    format!("{mantissa}e{}", c_exponent(exp))
}

/// Output line for the integration mode `label`.
fn report(label: &str, ans: f64, err: f64) -> String {
    format!("p={label:>3}, ans={ans:20.16}, err={:>20}", general(err, 16))
}

/// Row of the comparison table: the method, its answer, and the
/// signed absolute and relative errors with respect to `REFERENCE`.
fn table_row(name: &str, ans: f64) -> String {
    let err = REFERENCE - ans;
    format!("{name:>10}  {ans:20.16}  {:>11}  {:>11}",
            scientific(err, 4), scientific(err / REFERENCE, 4))
}

/// Comparison of the elementary rules applied to `f` on \[A, B\]
/// with the reference value.
fn rules_table() -> Result<Vec<String>, quad1d::Error<f64>> {
    let mut rows = vec![
        format!("{:>10}  {:>20}  {:>11}  {:>11}",
                "Method", "Answer", "Error", "Rel Error"),
        table_row("reference", REFERENCE),
    ];
    for rule in Rule::ALL {
        rows.push(table_row(rule.name(), rule.apply(f, A, B)?));
    }
    Ok(rows)
}

fn log_rules() -> Result<(), quad1d::Error<f64>> {
    for row in rules_table()? {
        info!("{row}");
    }
    Ok(())
}

/// Compute both integrals and return the output lines.
fn run() -> Result<[String; 2], quad1d::Error<f64>> {
    let plain = qags(f, A, B).integrate()?;
    debug!(neval = plain.neval, subintervals = plain.subintervals, "plain");
    let alg = qaws(f, A, B, ALPHA, BETA).integrate()?;
    debug!(neval = alg.neval, subintervals = alg.subintervals, "weighted");
    Ok([report("1", plain.value, plain.abserr),
        report("alg", alg.value, alg.abserr)])
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    log_rules()?;
    for line in run()? {
        println!("{line}");
    }
    Ok(())
}
