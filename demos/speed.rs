// Trivial code to have a rough estimate of the speed.

use std::error::Error;
use quad1d::{qags, qaws};

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let mut sum = 0.; // do something with the integrals

    let mut n = 0;
    let mut neval = 0;
    for _ in 0..1_000 {
        for i in 1..100 {
            n += 1;
            let c = i as f64 / 10.;
            let r = qags(|x: f64| (c * x).cos() / (1. + x * x), 0., 10.)
                .limit(0).integrate()?;
            neval += r.neval;
            sum += r.value;
        }
    }
    println!("qags sum: {:.12} (#eval {:.2})", sum, neval as f64 / n as f64);

    sum = 0.;
    n = 0;
    neval = 0;
    for _ in 0..1_000 {
        for i in 1..100 {
            n += 1;
            let beta = i as f64 / 50. - 0.99;
            let r = qaws(|x: f64| x.exp(), 0., 1., 0., beta).integrate()?;
            neval += r.neval;
            sum += r.value;
        }
    }
    println!("qaws sum: {:.12} (#eval {:.2})", sum, neval as f64 / n as f64);
    Ok(())
}
