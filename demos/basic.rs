use std::error::Error;
use std::f64::consts::PI;
use quad1d::{qags, qaws, rules::Rule, Weight};

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let f1 = |x: f64| x.sin();
    let r = qags(f1, 0., PI).integrate()?;
    println!("f1: {} ± {:e} ({} evaluations)", r.value, r.abserr, r.neval);

    // Singular at 0: extrapolation takes over.
    let f2 = |x: f64| x.ln() / x.sqrt();
    let r = qags(f2, 0., 1.).rtol(1e-10).integrate()?;
    println!("f2: {} ± {:e} ({} subintervals)",
             r.value, r.abserr, r.subintervals);

    // Same singularity handled by the weight.
    let (v, e) = qaws(|_| 1., 0., 1., -0.5, 0.).weight(Weight::AlgLogA)
        .integral()?;
    println!("f2: {} ± {:e} (qaws)", v, e);

    let f3 = |x: f64| (x * x).cos();
    for rule in Rule::ALL {
        println!("f3: {:>10} {}", rule, rule.apply(f3, 0., 1.)?);
    }
    println!("f3: {:>10} {}", "qags", qags(f3, 0., 1.).integral()?.0);

    // An integrand that may fail.
    let f4 = |x: f64| if x < 2. { Ok(x.sqrt()) } else { Err("x ≥ 2") };
    match qags(f4, 0., 3.).integrate() {
        Ok(r) => println!("f4: {}", r.value),
        Err(e) => println!("f4: {}", e),
    }
    Ok(())
}
