//! Integrate f(x)(2.2 - x)^β on \[1.3, 2.2\] for many random β, in
//! parallel.

use std::{error::Error, iter, time::Instant};
use quad1d::{qags, qaws};
use rand::prelude::*;
use rayon::prelude::*;

fn f(x: f64) -> f64 {
    4. * (0.5 * x).cos() * (-1.25 * x).exp()
        + 2. * (4.5 * x).sin() * (x / 8.).exp()
        + 2.
}

fn main() -> Result<(), Box<dyn Error + 'static>> {
    const N: usize = 100_000;
    const A: f64 = 1.3;
    const B: f64 = 2.2;
    let levels: Vec<_> = iter::from_fn(|| Some(1.9 * random::<f64>() - 0.9))
        .take(N).collect();
    let mut out = Vec::with_capacity(N);

    let now = Instant::now();
    levels
        .par_iter()
        .map(|&beta| qaws(f, A, B, 0., beta).integral().map(|r| r.0))
        .collect_into_vec(&mut out);
    let failed = out.iter().filter(|r| r.is_err()).count();
    println!("qaws: {} secs ({} failures)", now.elapsed().as_secs_f64(),
             failed);

    let now = Instant::now();
    levels
        .par_iter()
        .map(|&beta| qags(|x: f64| f(x) * (B - x).powf(beta), A, B)
             .integral().map(|r| r.0))
        .collect_into_vec(&mut out);
    let failed = out.iter().filter(|r| r.is_err()).count();
    println!("qags: {} secs ({} failures)", now.elapsed().as_secs_f64(),
             failed);

    Ok(())
}
