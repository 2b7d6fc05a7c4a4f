//! One dimensional adaptive quadrature.
//!
//! This crate offers *generic* adaptive integration algorithms for
//! functions from ℝ to ℝ on a bounded interval \[a,b\].  They follow
//! the strategy of QUADPACK: the interval is split into subintervals,
//! the one carrying the largest error estimate being bisected first,
//! until the sum of the local error estimates meets the requested
//! tolerance.
//!
//! # Example
//!
//! All integration procedures have the same structure.  For example
//! [`qags`] specifies the function `f` and the interval \[`a`, `b`\].
//! It returns a structure [`Qags`] which provides methods to specify
//! various parameters (such as [`rtol`][Qags::rtol]) and functions to
//! compute the integral (such as [`integral`][Qags::integral] and
//! [`integrate`][Qags::integrate]).
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use quad1d::qags;
//! let (v, err) = qags(|x: f64| x.sin(), 0., std::f64::consts::PI)
//!     .integral()?;
//! assert!((v - 2.).abs() <= err);
//! # Ok(()) }
//! ```
//!
//! Integrands with algebraic (and possibly logarithmic) singularities
//! at the end points are best handled by [`qaws`] which treats the
//! weight (x-a)^α (b-x)^β analytically:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use quad1d::qaws;
//! // ∫₋₁¹ (1+x)^-½ (1-x)^-½ dx = π
//! let (v, err) = qaws(|_| 1., -1., 1., -0.5, -0.5).integral()?;
//! assert!((v - std::f64::consts::PI).abs() <= err);
//! # Ok(()) }
//! ```
//!
//! # Use with your own types
//!
//! This library can readily be used with types `f64` and `f32`.  To
//! use it with another floating point type, implement the trait
//! [`Real`] for it, which in turn requires that you decide which type
//! will hold the default tolerances (for example [`Tol<t>`][Tol])
//! and implement [`Tolerance`] and [`Default`] for it.

#![cfg_attr(feature = "nightly", feature(never_type))]
#![allow(clippy::excessive_precision)]

use std::{
    f64::consts::PI,
    fmt::{self, Debug, Display, Formatter},
    ops::{
        Neg, Add, Sub, Mul, Div,
        AddAssign, SubAssign, MulAssign,
    },
    marker::PhantomData,
    result::Result,
};
use tracing::{debug, trace};

#[cfg(feature = "nightly")]
/// Type indicating that no error is raised by the function.
pub type NoError = !;
#[cfg(not(feature = "nightly"))]
#[derive(Debug)]
/// Type indicating that no error is raised by the function.
pub enum NoError {}

/// Errors that may be returned by the integration methods.
///
/// The variants reporting an abnormal termination of the adaptive
/// process carry the best estimate `value` of the integral and of its
/// absolute error `abserr` available at that moment.
#[derive(Debug)]
pub enum Error<T, E = NoError> {
    /// Error indicating that the function evaluated at `x` returned
    /// the non-finite value `fx`.  Also used with `x = fx` for
    /// non-finite bounds of the interval.
    NotFinite { x: T, fx: T },
    /// Error returned by the function evaluated at `x`.
    Fun { x: T, err: E },
    /// The interval \[a, b\] must satisfy a < b.
    InvalidInterval { a: T, b: T },
    /// The exponents of the weight must both be > -1.
    InvalidWeight { alpha: T, beta: T },
    /// The maximum number of subintervals has been reached.
    Limit { value: T, abserr: T },
    /// The occurrence of roundoff error prevents the requested
    /// tolerance from being achieved.
    Roundoff { value: T, abserr: T },
    /// Extremely bad integrand behaviour occurs at some points of the
    /// integration interval.
    BadIntegrand { value: T, abserr: T },
    /// Roundoff error was detected in the extrapolation table.  It is
    /// presumed that the requested tolerance cannot be achieved and
    /// that the returned value is the best that can be obtained.
    ExtrapolationRoundoff { value: T, abserr: T },
    /// The integral is probably divergent, or slowly convergent.
    Divergent { value: T, abserr: T },
}
impl<T: Display, E: Debug> Display for Error<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFinite { x, fx } => {
                write!(f, "evaluating the function at {} yields {} which is \
                           not finite", x, fx)
            }
            Error::Fun { x, err } => {
                write!(f, "evaluating the function at {} yields the error \
                          {:?}", x, err)
            }
            Error::InvalidInterval { a, b } =>
                write!(f, "the interval [{a}, {b}] must satisfy a < b"),
            Error::InvalidWeight { alpha, beta } =>
                write!(f, "the exponents of the weight must be > -1 \
                           (alpha = {alpha}, beta = {beta})"),
            Error::Limit { value, abserr } =>
                write!(f, "maximum number of subintervals reached \
                           (integral ≈ {value}, error ≈ {abserr})"),
            Error::Roundoff { value, abserr } =>
                write!(f, "roundoff error prevents the requested tolerance \
                           from being achieved (integral ≈ {value}, \
                           error ≈ {abserr})"),
            Error::BadIntegrand { value, abserr } =>
                write!(f, "extremely bad integrand behaviour occurs at some \
                           points of the integration interval \
                           (integral ≈ {value}, error ≈ {abserr})"),
            Error::ExtrapolationRoundoff { value, abserr } =>
                write!(f, "roundoff error detected in the extrapolation \
                           table (integral ≈ {value}, error ≈ {abserr})"),
            Error::Divergent { value, abserr } =>
                write!(f, "the integral is probably divergent, or slowly \
                           convergent (integral ≈ {value}, \
                           error ≈ {abserr})"),
        }
    }
}

impl<T: Debug + Display, E: Debug> std::error::Error for Error<T, E> {}

impl<T: Clone, E> Error<T, E> {
    /// Return the estimate of the integral and of its absolute error
    /// when the error reports an abnormal termination of the adaptive
    /// process, and `None` otherwise.
    pub fn estimate(&self) -> Option<(T, T)> {
        match self {
            Error::Limit { value, abserr }
            | Error::Roundoff { value, abserr }
            | Error::BadIntegrand { value, abserr }
            | Error::ExtrapolationRoundoff { value, abserr }
            | Error::Divergent { value, abserr } =>
                Some((value.clone(), abserr.clone())),
            _ => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////
//
// Error returning functions

/// A float type or a Result type for floats.  This is intended for
/// copy types.
pub trait FloatOrError<T> {
    type Error;
    fn to_result(self) -> Result<T, Self::Error>;
}

macro_rules! impl_float_or_error { ($t: ty) => {
    impl FloatOrError<$t> for $t {
        type Error = NoError;

        #[inline]
        fn to_result(self) -> Result<$t, NoError> { Ok(self) }
    }
    impl<E> FloatOrError<$t> for Result<$t, E> {
        type Error = E;

        #[inline]
        fn to_result(self) -> Result<$t, E> { self }
    }
}}

impl_float_or_error!(f64);
impl_float_or_error!(f32);

/// Evaluate `f` at `x` and make sure the value is finite.
#[inline]
fn eval_float_result<T, F, R>(mut f: F, x: T) -> Result<T, Error<T, R::Error>>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    let fx = f(x).to_result().map_err(|err| Error::Fun { x, err })?;
    if fx.is_finite() { Ok(fx) } else { Err(Error::NotFinite { x, fx }) }
}

////////////////////////////////////////////////////////////////////////
//
// Real types

/// Trait indicating that the type is suitable for the integration
/// algorithms.
pub trait Real:
    Copy + PartialOrd + Debug + Display
    + Neg<Output = Self> + Add<Output = Self> + Sub<Output = Self>
    + Mul<Output = Self> + Div<Output = Self>
    + AddAssign + SubAssign + MulAssign
{
    /// Type for the default tolerances.
    type DefaultTolerance: Default + Tolerance<Self>;

    const ZERO: Self;
    const ONE: Self;
    /// Machine epsilon.
    const EPSILON: Self;
    /// Smallest positive normal number.
    const UFLOW: Self;
    /// Largest finite number.
    const OFLOW: Self;

    /// Convert the constant `x` to `Self` (rounding if needed).
    fn from_f64(x: f64) -> Self;
    fn abs(self) -> Self;
    /// Maximum of `self` and `y`, ignoring NaN.
    fn max(self, y: Self) -> Self;
    fn powf(self, e: Self) -> Self;
    /// Natural logarithm.
    fn ln(self) -> Self;
    fn is_finite(self) -> bool;
}

macro_rules! impl_real_fXX {
    ($t: ty) => {
        impl Real for $t {
            type DefaultTolerance = Tol<$t>;
            const ZERO: Self = 0.;
            const ONE: Self = 1.;
            const EPSILON: Self = <$t>::EPSILON;
            const UFLOW: Self = <$t>::MIN_POSITIVE;
            const OFLOW: Self = <$t>::MAX;

            #[inline]
            fn from_f64(x: f64) -> Self { x as $t }
            #[inline]
            fn abs(self) -> Self { <$t>::abs(self) }
            #[inline]
            fn max(self, y: Self) -> Self { <$t>::max(self, y) }
            #[inline]
            fn powf(self, e: Self) -> Self { <$t>::powf(self, e) }
            #[inline]
            fn ln(self) -> Self { <$t>::ln(self) }
            #[inline]
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
        }
    }
}

impl_real_fXX!(f64);
impl_real_fXX!(f32);

////////////////////////////////////////////////////////////////////////
//
// Tolerances

/// Trait for the accuracy requirement of the integration algorithms.
pub trait Tolerance<T> {
    /// Return the bound that the error estimate must not exceed given
    /// the current approximation `integral` of the integral.
    ///
    /// This function may mutate `self` as it may contain resources
    /// that are not reallocated at every call of `bound`.
    fn bound(&mut self, integral: T) -> T;
}

/// Indicate that the type `Self` uses relative and absolute
/// tolerances that can be updated from type `U`.
pub trait SetTolerances<U> {
    /// Set the relative tolerance.  Set the default value if `rtol` is ≤ 0.
    fn set_rtol(&mut self, rtol: U);
    /// Set the absolute tolerance.  Set the default value if `atol` is < 0.
    fn set_atol(&mut self, atol: U);
}

/// Enable using a closure `bound` as an accuracy requirement.  The
/// call `bound(i)` must return the largest acceptable absolute error
/// when the current approximation of the integral is `i`.
impl<T, F> Tolerance<T> for F
where
    F: FnMut(T) -> T,
    T: Real,
{
    fn bound(&mut self, integral: T) -> T {
        self(integral)
    }
}

/// Accuracy requirement based on a relative tolerance `rtol` and an
/// absolute tolerance `atol`: the integration stops as soon as the
/// error estimate is ≤ max(`atol`, `rtol`·|I|) where I is the
/// approximation of the integral.
#[derive(Clone, Debug)]
pub struct Tol<U> {
    /// Relative tolerance.
    pub rtol: U,
    /// Absolute tolerance.
    pub atol: U,
}

macro_rules! impl_traits_tol_fXX {
    ($t: ty, $default: expr) => {
        impl Default for Tol<$t> {
            fn default() -> Self { Tol { rtol: $default, atol: $default } }
        }
        impl Tolerance<$t> for Tol<$t> {
            #[inline]
            fn bound(&mut self, integral: $t) -> $t {
                self.atol.max(self.rtol * integral.abs())
            }
        }
        impl SetTolerances<$t> for Tol<$t> {
            /// A positive `rtol` is raised to 50ε if smaller.
            fn set_rtol(&mut self, rtol: $t) {
                self.rtol = if rtol > 0. { rtol.max(50. * <$t>::EPSILON) }
                            else { $default }
            }
            fn set_atol(&mut self, atol: $t) {
                self.atol = if atol >= 0. { atol } else { $default }
            }
        }
    }
}

impl_traits_tol_fXX!(f64, 1.49e-8);
impl_traits_tol_fXX!(f32, 3.4526698e-4); // √ε

////////////////////////////////////////////////////////////////////////
//
// Results

/// Successful outcome of an integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integral<T> {
    /// Approximation of the integral.
    pub value: T,
    /// Estimate of the absolute error of `value`.
    pub abserr: T,
    /// Number of evaluations of the integrand.
    pub neval: usize,
    /// Number of subintervals of the final partition.
    pub subintervals: usize,
}

/// Abnormal termination of the adaptive process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flag {
    Limit,
    Roundoff,
    BadIntegrand,
    ExtrapolationRoundoff,
    Divergent,
}

impl Flag {
    fn into_error<T, E>(self, value: T, abserr: T) -> Error<T, E> {
        match self {
            Flag::Limit => Error::Limit { value, abserr },
            Flag::Roundoff => Error::Roundoff { value, abserr },
            Flag::BadIntegrand => Error::BadIntegrand { value, abserr },
            Flag::ExtrapolationRoundoff =>
                Error::ExtrapolationRoundoff { value, abserr },
            Flag::Divergent => Error::Divergent { value, abserr },
        }
    }
}

fn finish<T: Real, E>(
    flag: Option<Flag>, value: T, abserr: T,
    neval: usize, subintervals: usize,
) -> Result<Integral<T>, Error<T, E>> {
    debug!(value = %value, abserr = %abserr, neval, subintervals,
           flag = ?flag, "integration finished");
    match flag {
        None => Ok(Integral { value, abserr, neval, subintervals }),
        Some(flag) => Err(flag.into_error(value, abserr)),
    }
}

////////////////////////////////////////////////////////////////////////
//
// Common structure definition for integration methods

/// Define the structure to hold the integration options and the
/// standard methods to set these.  Extra fields are given with their
/// default value.
macro_rules! new_quadrature_method {
    // Function to initialize the struct.
    ($fun: ident,
     // The structure to hold the options (and other fields).
     $(#[$doc: meta])* $struct: ident,
     $($field: ident : $t: ty = $default: expr),*) => {
         $(#[$doc])*
         pub struct $struct<T, F, Tl, E>
         where Tl: Tolerance<T> {
             f: F,
             a: T,  // `a` and `b` are the bounds of the interval.
             b: T,
             error: PhantomData<E>, // Error that `f` might return
             tol: Tl,  // Accuracy requirement
             limit: usize,
             $($field: $t,)*
         }

         impl<T, F, E> $struct<T, F, T::DefaultTolerance, E>
         where T: Real {
             /// Private constructor called by $fun with more constraints.
             #[must_use]
             fn new(f: F, a: T, b: T) -> Self {
                 $struct {
                     f,  a,  b,
                     error: PhantomData,
                     tol: T::DefaultTolerance::default(),
                     limit: 50,
                     $($field: $default,)*
                 }
             }
         }

         impl<T, F, Tl, E> $struct<T, F, Tl, E>
         where
             T: Real,
             Tl: Tolerance<T>,
         {
             /// Check that `a` and `b` are finite.
             #[inline]
             fn check_interval_bounds(&self) -> Result<(), Error<T, E>> {
                 if !self.a.is_finite() {
                     return Err(Error::NotFinite { x: self.a, fx: self.a })
                 }
                 if !self.b.is_finite() {
                     return Err(Error::NotFinite { x: self.b, fx: self.b })
                 }
                 Ok(())
             }
         }

         impl<T, F, Tl, E> $struct<T, F, Tl, E>
         where Tl: Tolerance<T> {
             /// Set the maximum number of subintervals.
             ///
             /// If `n` is 0, it is interpreted as “unlimited” (actually
             /// [`usize::MAX`]).
             pub fn limit(mut self, n: usize) -> Self {
                 if n == 0 {
                     self.limit = usize::MAX;
                 } else {
                     self.limit = n;
                 }
                 self
             }

             /// Change the accuracy requirement to `tol`.
             ///
             /// You can use a closure `FnMut(T) -> T` returning the
             /// acceptable absolute error given the current
             /// approximation of the integral.
             pub fn tolerance<Tr>(self, tol: Tr) -> $struct<T, F, Tr, E>
             where Tr: Tolerance<T> {
                 $struct {
                     tol,
                     f: self.f,  a: self.a,  b: self.b,
                     error: self.error,
                     limit: self.limit,
                     $( $field: self.$field, )*
                 }
             }

             /// Set the the relative tolerance (of an accuracy
             /// requirement that implements [`SetTolerances`]), leaving
             /// unchanged the value of the absolute tolerance.
             ///
             /// Set the default value if `rtol` is ≤ 0.
             pub fn rtol<U>(mut self, rtol: U) -> Self
             where Tl: SetTolerances<U> {
                 self.tol.set_rtol(rtol);
                 self
             }
             /// Set the the absolute tolerance (of an accuracy
             /// requirement that implements [`SetTolerances`]), leaving
             /// unchanged the value of the relative tolerance.
             ///
             /// Set the default value if `atol` is < 0.
             pub fn atol<U>(mut self, atol: U) -> Self
             where Tl: SetTolerances<U> {
                 self.tol.set_atol(atol);
                 self
             }
         }
     }
}

////////////////////////////////////////////////////////////////////////
//
// Gauss–Kronrod rules

/// A Gauss–Kronrod rule on \[-1, 1\].  `xgk` lists the non-negative
/// nodes in decreasing order, the last one being 0, and `wgk` their
/// weights.  The nodes of the embedded Gauss rule are `xgk[1]`,
/// `xgk[3]`,… (and 0 if `gauss_center`) with weights `wg`.
struct Kronrod {
    xgk: &'static [f64],
    wgk: &'static [f64],
    wg: &'static [f64],
    gauss_center: bool,
}

const GK15: Kronrod = Kronrod {
    xgk: &[0.991455371120812639206854697526329,
           0.949107912342758524526189684047851,
           0.864864423359769072789712788640926,
           0.741531185599394439863864773280788,
           0.586087235467691130294144845693013,
           0.405845151377397166906606412076961,
           0.207784955007898467600689403773245,
           0.0],
    wgk: &[0.022935322010529224963732008058970,
           0.063092092629978553290700663189204,
           0.104790010322250183839876322541518,
           0.140653259715525918745189590510238,
           0.169004726639267902826583426598550,
           0.190350578064785409913256402421014,
           0.204432940075298892414161999234649,
           0.209482141084727828012999174891714],
    wg: &[0.129484966168869693270611432679082,
          0.279705391489276667901467771423780,
          0.381830050505118944950369775488975,
          0.417959183673469387755102040816327],
    gauss_center: true,
};

const GK21: Kronrod = Kronrod {
    xgk: &[0.995657163025808080735527280689003,
           0.973906528517171720077964012084452,
           0.930157491355708226001207180059508,
           0.865063366688984510732096688423493,
           0.780817726586416897063717578345042,
           0.679409568299024406234327365114874,
           0.562757134668604683339000099272694,
           0.433395394129247190799265943165784,
           0.294392862701460198131126603103866,
           0.148874338981631210884826001129720,
           0.0],
    wgk: &[0.011694638867371874278064396062192,
           0.032558162307964727478818972459390,
           0.054755896574351996031381300244580,
           0.075039674810919952767043140916190,
           0.093125454583697605535065465083366,
           0.109387158802297641899210590325805,
           0.123491976262065851077208643474262,
           0.134709217311473325928054001771707,
           0.142775938577060080797094273138717,
           0.147739104901338491374841515972068,
           0.149445554002916905664936468389821],
    wg: &[0.066671344308688137593568809893332,
          0.149451349150580593145776339657697,
          0.219086362515982043995534934228163,
          0.269266719309996355091226921569469,
          0.295524224714752870173892994651338],
    gauss_center: false,
};

/// Estimates computed by a rule on a single panel.
#[derive(Clone, Copy, Debug)]
struct Panel<T> {
    result: T,
    abserr: T,
    /// Approximation of the integral of |f|.
    resabs: T,
    /// Approximation of the integral of |f - I/(b-a)|.
    resasc: T,
}

/// Scale the raw Gauss–Kronrod difference `err` into an error estimate.
fn rescale_error<T: Real>(err: T, resabs: T, resasc: T) -> T {
    let mut err = err.abs();
    if resasc != T::ZERO && err != T::ZERO {
        let scale = (T::from_f64(200.) * err / resasc)
            .powf(T::from_f64(1.5));
        err = if scale < T::ONE { resasc * scale } else { resasc };
    }
    let eps50 = T::from_f64(50.) * T::EPSILON;
    if resabs > T::UFLOW / eps50 {
        err = err.max(eps50 * resabs)
    }
    err
}

impl Kronrod {
    /// Apply the rule to `g` on \[`a`, `b`\].
    fn apply<T, G, E>(&self, mut g: G, a: T, b: T)
                      -> Result<Panel<T>, Error<T, E>>
    where
        T: Real,
        G: FnMut(T) -> Result<T, Error<T, E>>,
    {
        let half = T::from_f64(0.5);
        let centr = half * (a + b);
        let hlgth = half * (b - a);
        let n = self.xgk.len() - 1; // Index of the centre.
        let mut fv1 = [T::ZERO; 10];
        let mut fv2 = [T::ZERO; 10];
        let fc = g(centr)?;
        let wc = T::from_f64(self.wgk[n]);
        let mut resg = if self.gauss_center {
            T::from_f64(self.wg[self.wg.len() - 1]) * fc
        } else {
            T::ZERO
        };
        let mut resk = wc * fc;
        let mut resabs = resk.abs();
        // Gauss nodes first, then the Kronrod extension.
        for j in (1..n).step_by(2).chain((0..n).step_by(2)) {
            let absc = hlgth * T::from_f64(self.xgk[j]);
            let fval1 = g(centr - absc)?;
            let fval2 = g(centr + absc)?;
            fv1[j] = fval1;
            fv2[j] = fval2;
            let fsum = fval1 + fval2;
            let w = T::from_f64(self.wgk[j]);
            if j % 2 == 1 {
                resg += T::from_f64(self.wg[j / 2]) * fsum;
            }
            resk += w * fsum;
            resabs += w * (fval1.abs() + fval2.abs());
        }
        let reskh = resk * half;
        let mut resasc = wc * (fc - reskh).abs();
        for j in 0..n {
            resasc += T::from_f64(self.wgk[j])
                * ((fv1[j] - reskh).abs() + (fv2[j] - reskh).abs());
        }
        let dhlgth = hlgth.abs();
        resabs *= dhlgth;
        resasc *= dhlgth;
        Ok(Panel {
            result: resk * hlgth,
            abserr: rescale_error((resk - resg) * hlgth, resabs, resasc),
            resabs,
            resasc,
        })
    }
}

////////////////////////////////////////////////////////////////////////
//
// Partition of the integration interval

/// Subintervals \[`alist[i]`, `blist[i]`\] of the integration range
/// with the integral `rlist[i]` and error `elist[i]` estimated on
/// each of them.  `iord` lists the indices of the subintervals by
/// decreasing error estimates (only its first part is maintained when
/// the number of subintervals gets close to the limit).
struct Partition<T> {
    alist: Vec<T>,
    blist: Vec<T>,
    rlist: Vec<T>,
    elist: Vec<T>,
    iord: Vec<usize>,
    /// Position in `iord` of the subinterval to bisect next.
    nrmax: usize,
    /// Index of the subinterval to bisect next.
    maxerr: usize,
    /// Error estimate on the subinterval `maxerr`.
    errmax: T,
}

impl<T: Real> Partition<T> {
    fn new(a: T, b: T, result: T, abserr: T) -> Self {
        Partition {
            alist: vec![a],
            blist: vec![b],
            rlist: vec![result],
            elist: vec![abserr],
            iord: vec![0],
            nrmax: 0,
            maxerr: 0,
            errmax: abserr,
        }
    }

    #[inline]
    fn len(&self) -> usize { self.alist.len() }

    #[inline]
    fn width(&self, i: usize) -> T { (self.blist[i] - self.alist[i]).abs() }

    fn sum(&self) -> T {
        let mut s = T::ZERO;
        for &r in &self.rlist { s += r }
        s
    }

    /// Replace the subinterval `maxerr` by its two halves
    /// \[`a1`, `b1`\] and \[`a2`, `b2`\], the one with the larger error
    /// keeping the index `maxerr`.
    fn split(&mut self, a1: T, b1: T, p1: &Panel<T>,
             a2: T, b2: T, p2: &Panel<T>) {
        let i = self.maxerr;
        if p2.abserr > p1.abserr {
            self.alist[i] = a2;
            self.alist.push(a1);
            self.blist.push(b1);
            self.rlist[i] = p2.result;
            self.rlist.push(p1.result);
            self.elist[i] = p2.abserr;
            self.elist.push(p1.abserr);
        } else {
            self.alist.push(a2);
            self.blist[i] = b1;
            self.blist.push(b2);
            self.rlist[i] = p1.result;
            self.rlist.push(p2.result);
            self.elist[i] = p1.abserr;
            self.elist.push(p2.abserr);
        }
    }

    /// Maintain the descending ordering of `iord` after a call to
    /// `split` and select the next subinterval to bisect.  `limit` is
    /// the maximum number of subintervals.
    fn sort(&mut self, limit: usize) {
        let last = self.len();
        self.iord.resize(last, 0);
        let el = &self.elist;
        let iord = &mut self.iord;
        if last <= 2 {
            iord[0] = 0;
            iord[1] = 1;
        } else {
            // Errors of the subintervals that were deemed too small to
            // be bisected (during extrapolation) may now be larger.
            let errmax = el[self.maxerr];
            while self.nrmax > 0 {
                let isucc = iord[self.nrmax - 1];
                if errmax <= el[isucc] { break }
                iord[self.nrmax] = isucc;
                self.nrmax -= 1;
            }
            // Only the `jupbn` first elements need to be sorted since
            // the remaining ones will never be bisected.
            let jupbn = if last > limit / 2 + 2 { limit + 3 - last }
                        else { last };
            let errmin = el[last - 1];
            // Insert `maxerr` by traversing the list top-down (1-based
            // indices below, as `i - 1` is the position being filled).
            let jbnd = jupbn - 1;
            let ibeg = self.nrmax + 2;
            let mut inserted = false;
            let mut i = ibeg;
            while i <= jbnd {
                let isucc = iord[i - 1];
                if errmax >= el[isucc] {
                    // Insert `last - 1` bottom-up.
                    iord[i - 2] = self.maxerr;
                    let mut k = jbnd;
                    let mut placed = false;
                    for _ in i..=jbnd {
                        let isucc = iord[k - 1];
                        if errmin < el[isucc] {
                            iord[k] = last - 1;
                            placed = true;
                            break;
                        }
                        iord[k] = isucc;
                        k -= 1;
                    }
                    if !placed { iord[i - 1] = last - 1 }
                    inserted = true;
                    break;
                }
                iord[i - 2] = isucc;
                i += 1;
            }
            if !inserted {
                iord[jbnd - 1] = self.maxerr;
                iord[jupbn - 1] = last - 1;
            }
        }
        self.maxerr = self.iord[self.nrmax];
        self.errmax = self.elist[self.maxerr];
    }
}

////////////////////////////////////////////////////////////////////////
//
// Epsilon algorithm

/// Maximum number of elements the epsilon table can contain.
const LIMEXP: usize = 50;

/// Wynn's epsilon algorithm applied to the sequence of the
/// approximations of the integral.
struct EpsilonTable<T> {
    /// The last column of the epsilon table (plus two workspace slots).
    tab: [T; LIMEXP + 2],
    /// Number of elements in `tab`.
    n: usize,
    /// The last three extrapolated values.
    res3la: [T; 3],
    /// Number of calls to `extrapolate`.
    nres: usize,
}

impl<T: Real> EpsilonTable<T> {
    fn new(first: T) -> Self {
        let mut tab = [T::ZERO; LIMEXP + 2];
        tab[0] = first;
        EpsilonTable { tab, n: 1, res3la: [T::ZERO; 3], nres: 0 }
    }

    #[inline]
    fn len(&self) -> usize { self.n }

    #[inline]
    fn push(&mut self, x: T) {
        self.tab[self.n] = x;
        self.n += 1;
    }

    /// Return the extrapolated value of the sequence and an estimate
    /// of its absolute error.
    fn extrapolate(&mut self) -> (T, T) {
        let eps = T::EPSILON;
        let eps5 = T::from_f64(5.) * eps;
        let oflow = T::OFLOW;
        self.nres += 1;
        let mut n = self.n;
        let mut abserr = oflow;
        let mut result = self.tab[n - 1];
        if n < 3 {
            return (result, abserr.max(eps5 * result.abs()))
        }
        let e = &mut self.tab;
        let num = n;
        e[n + 1] = e[n - 1];
        let newelm = (n - 1) / 2;
        e[n - 1] = oflow;
        let mut k1 = n;
        for i in 1..=newelm {
            let k2 = k1 - 1;
            let k3 = k1 - 2;
            let res = e[k1 + 1];
            let e0 = e[k3 - 1];
            let e1 = e[k2 - 1];
            let e2 = res;
            let e1abs = e1.abs();
            let delta2 = e2 - e1;
            let err2 = delta2.abs();
            let tol2 = e2.abs().max(e1abs) * eps;
            let delta3 = e1 - e0;
            let err3 = delta3.abs();
            let tol3 = e1abs.max(e0.abs()) * eps;
            if err2 <= tol2 && err3 <= tol3 {
                // e0, e1 and e2 are equal to within machine accuracy:
                // convergence is assumed.
                return (res, (err2 + err3).max(eps5 * res.abs()))
            }
            let e3 = e[k1 - 1];
            e[k1 - 1] = e1;
            let delta1 = e1 - e3;
            let err1 = delta1.abs();
            let tol1 = e1abs.max(e3.abs()) * eps;
            // Two elements are very close: omit a part of the table by
            // adjusting its length.
            if err1 <= tol1 || err2 <= tol2 || err3 <= tol3 {
                n = i + i - 1;
                break;
            }
            let ss = T::ONE / delta1 + T::ONE / delta2 - T::ONE / delta3;
            let epsinf = (ss * e1).abs();
            // Irregular behaviour (NaN included).
            if !(epsinf > T::from_f64(1e-4)) {
                n = i + i - 1;
                break;
            }
            let res = e1 + T::ONE / ss;
            e[k1 - 1] = res;
            k1 -= 2;
            let error = err2 + (res - e2).abs() + err3;
            if error <= abserr {
                abserr = error;
                result = res;
            }
        }
        // Shift the table.
        if n == LIMEXP { n = 2 * (LIMEXP / 2) - 1 }
        let mut ib = if num % 2 == 1 { 0 } else { 1 };
        for _ in 0..=newelm {
            e[ib] = e[ib + 2];
            ib += 2;
        }
        if num != n {
            let mut indx = num - n;
            for i in 0..n {
                e[i] = e[indx];
                indx += 1;
            }
        }
        self.n = n;
        if self.nres < 4 {
            self.res3la[self.nres - 1] = result;
            abserr = oflow;
        } else {
            let r = &mut self.res3la;
            abserr = (result - r[2]).abs() + (result - r[1]).abs()
                + (result - r[0]).abs();
            r[0] = r[1];
            r[1] = r[2];
            r[2] = result;
        }
        (result, abserr.max(eps5 * result.abs()))
    }
}

////////////////////////////////////////////////////////////////////////
//
// QAGS

/// Integrate the function `f` on the interval \[`a`, `b`\] using
/// adaptive Gauss–Kronrod (21 points) quadrature with extrapolation
/// by the epsilon algorithm.
///
/// The interval may be given with `b < a` in which case the integral
/// changes sign.  This method handles integrable singularities at the
/// end points (and, to some extent, in the interior of the interval)
/// well.  The default accuracy requirement is given by
/// `T::DefaultTolerance` and at most 50 subintervals are used.
///
/// # Example
///
/// ```
/// use quad1d::qags;
/// // ∫₀¹ log(x)/√x dx = -4
/// let r = qags(|x: f64| x.ln() / x.sqrt(), 0., 1.).integrate()?;
/// assert!((r.value + 4.).abs() < 1e-10);
/// # Ok::<(), quad1d::Error<f64>>(())
/// ```
#[must_use]
pub fn qags<T, F, R>(f: F, a: T, b: T) -> Qags<T, F, T::DefaultTolerance, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    Qags::new(f, a, b)
}

new_quadrature_method!(
    qags,
    /// Adaptive Gauss–Kronrod integration with extrapolation
    /// (see [`qags`]).
    Qags,);

impl<T, F, R, Tl> Qags<T, F, Tl, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
    Tl: Tolerance<T>,
{
    /// Return the approximation of the integral and an estimate of
    /// its absolute error.
    pub fn integral(&mut self) -> Result<(T, T), Error<T, R::Error>> {
        let r = self.integrate()?;
        Ok((r.value, r.abserr))
    }

    /// Compute the integral and return it with details about the
    /// computation.
    ///
    /// The error [`Error::NotFinite`] (resp. [`Error::Fun`]) is
    /// returned if the function `f` returns a non-finite value (resp.
    /// an error).  The abnormal terminations of the adaptive process
    /// are reported as errors carrying the best estimate available.
    pub fn integrate(&mut self) -> Result<Integral<T>, Error<T, R::Error>> {
        self.check_interval_bounds()?;
        let (a, b, limit) = (self.a, self.b, self.limit);
        let mut g = |x: T| eval_float_result(&mut self.f, x);
        let eps = T::EPSILON;
        let half = T::from_f64(0.5);
        let hundred = T::from_f64(100.);

        let first = GK21.apply(&mut g, a, b)?;
        let mut result = first.result;
        let mut abserr = first.abserr;
        let defabs = first.resabs;
        let dres = result.abs();
        let errbnd = self.tol.bound(result);
        let mut flag = None;
        if abserr <= hundred * eps * defabs && abserr > errbnd {
            flag = Some(Flag::Roundoff)
        }
        if limit == 1 { flag = Some(Flag::Limit) }
        if flag.is_some() || (abserr <= errbnd && abserr != first.resasc)
            || abserr == T::ZERO {
            return finish(flag, result, abserr, 21, 1)
        }

        let mut part = Partition::new(a, b, result, abserr);
        let mut table = EpsilonTable::new(result);
        let mut area = result;
        let mut errsum = abserr;
        abserr = T::OFLOW;
        let mut erlarg = errsum;
        let mut ertest = errbnd;
        let mut small = T::ZERO;
        let mut correc = T::ZERO;
        let (mut ktmin, mut iroff1, mut iroff2, mut iroff3) = (0, 0, 0, 0);
        let mut extrap = false;
        let mut noext = false;
        let mut ierro = false;
        let ksgn = dres >= (T::ONE - T::from_f64(50.) * eps) * defabs;
        let mut converged = false;

        for last in 2..=limit {
            // Bisect the subinterval with the largest error estimate.
            let maxerr = part.maxerr;
            let a1 = part.alist[maxerr];
            let b2 = part.blist[maxerr];
            let b1 = half * (a1 + b2);
            let a2 = b1;
            let erlast = part.errmax;
            let p1 = GK21.apply(&mut g, a1, b1)?;
            let p2 = GK21.apply(&mut g, a2, b2)?;
            let area12 = p1.result + p2.result;
            let erro12 = p1.abserr + p2.abserr;
            errsum = errsum + erro12 - erlast;
            area = area + area12 - part.rlist[maxerr];
            if p1.resasc != p1.abserr && p2.resasc != p2.abserr {
                if (part.rlist[maxerr] - area12).abs()
                    <= T::from_f64(1e-5) * area12.abs()
                    && erro12 >= T::from_f64(0.99) * erlast {
                    if extrap { iroff2 += 1 } else { iroff1 += 1 }
                }
                if last > 10 && erro12 > erlast { iroff3 += 1 }
            }
            part.split(a1, b1, &p1, a2, b2, &p2);
            let errbnd = self.tol.bound(area);
            trace!(last, area = %area, errsum = %errsum, errbnd = %errbnd,
                   "bisected [{}, {}]", a1, b2);

            if iroff1 + iroff2 >= 10 || iroff3 >= 20 {
                flag = Some(Flag::Roundoff)
            }
            if iroff2 >= 5 { ierro = true }
            if last == limit { flag = Some(Flag::Limit) }
            if a1.abs().max(b2.abs())
                <= (T::ONE + hundred * eps)
                * (a2.abs() + T::from_f64(1000.) * T::UFLOW) {
                flag = Some(Flag::BadIntegrand)
            }
            part.sort(limit);
            if errsum <= errbnd {
                converged = true;
                break;
            }
            if flag.is_some() { break }
            if last == 2 {
                small = (b - a).abs() * T::from_f64(0.375);
                erlarg = errsum;
                ertest = errbnd;
                table.push(area);
                continue;
            }
            if noext { continue }
            erlarg -= erlast;
            if (b1 - a1).abs() > small { erlarg += erro12 }
            if !extrap {
                // Test whether the interval to be bisected next is the
                // smallest one.
                if part.width(part.maxerr) > small { continue }
                extrap = true;
                part.nrmax = 1;
            }
            if !ierro && erlarg > ertest {
                // The smallest interval has the largest error.  Before
                // bisecting, decrease the sum of the errors over the
                // larger intervals (`erlarg`) and perform extrapolation.
                let jupbnd = if last > 2 + limit / 2 { limit + 3 - last }
                             else { last };
                let mut larger = false;
                for _ in part.nrmax..jupbnd {
                    part.maxerr = part.iord[part.nrmax];
                    part.errmax = part.elist[part.maxerr];
                    if part.width(part.maxerr) > small {
                        larger = true;
                        break;
                    }
                    part.nrmax += 1;
                }
                if larger { continue }
            }
            table.push(area);
            let (reseps, abseps) = table.extrapolate();
            debug!(last, result = %reseps, abserr = %abseps, "extrapolation");
            ktmin += 1;
            if ktmin > 5 && abserr < T::from_f64(1e-3) * errsum {
                flag = Some(Flag::ExtrapolationRoundoff)
            }
            if abseps < abserr {
                ktmin = 0;
                abserr = abseps;
                result = reseps;
                correc = erlarg;
                ertest = self.tol.bound(reseps);
                if abserr <= ertest { break }
            }
            // Prepare bisection of the smallest interval.
            if table.len() == 1 { noext = true }
            if flag == Some(Flag::ExtrapolationRoundoff) { break }
            part.maxerr = part.iord[0];
            part.errmax = part.elist[part.maxerr];
            part.nrmax = 0;
            extrap = false;
            small *= half;
            erlarg = errsum;
        }

        let last = part.len();
        let neval = 42 * last - 21;
        if converged {
            return finish(None, part.sum(), errsum, neval, last)
        }
        if abserr == T::OFLOW {
            return finish(flag, part.sum(), errsum, neval, last)
        }
        if flag.is_some() || ierro {
            if ierro { abserr += correc }
            if flag.is_none() { flag = Some(Flag::Roundoff) }
            if result != T::ZERO && area != T::ZERO {
                if abserr / result.abs() > errsum / area.abs() {
                    return finish(flag, part.sum(), errsum, neval, last)
                }
            } else if abserr > errsum {
                return finish(flag, part.sum(), errsum, neval, last)
            } else if area == T::ZERO {
                return finish(flag, result, abserr, neval, last)
            }
        }
        // Test on divergence.
        if ksgn || result.abs().max(area.abs()) > defabs * T::from_f64(0.01) {
            let ratio = result / area;
            if T::from_f64(0.01) > ratio || ratio > hundred
                || errsum > area.abs() {
                flag = Some(Flag::Divergent)
            }
        }
        finish(flag, result, abserr, neval, last)
    }
}

////////////////////////////////////////////////////////////////////////
//
// QAWS

/// Logarithmic factors that may complement the algebraic weight
/// (x-a)^α (b-x)^β of [`qaws`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Weight {
    /// w(x) = (x-a)^α (b-x)^β.
    #[default]
    Alg,
    /// w(x) = (x-a)^α (b-x)^β log(x-a).
    AlgLogA,
    /// w(x) = (x-a)^α (b-x)^β log(b-x).
    AlgLogB,
    /// w(x) = (x-a)^α (b-x)^β log(x-a) log(b-x).
    AlgLog,
}

impl Weight {
    /// Whether the weight contains the factor log(x-a).
    pub fn log_a(self) -> bool {
        matches!(self, Weight::AlgLogA | Weight::AlgLog)
    }

    /// Whether the weight contains the factor log(b-x).
    pub fn log_b(self) -> bool {
        matches!(self, Weight::AlgLogB | Weight::AlgLog)
    }
}

/// Modified Chebyshev moments of the weight on \[-1, 1\]:
/// `ri[k]` = ∫ (1+x)^α T_k(x) dx, `rj[k]` = ∫ (1-x)^β T_k(x) dx,
/// `rg[k]` = ∫ (1+x)^α log((1+x)/2) T_k(x) dx and
/// `rh[k]` = ∫ (1-x)^β log((1-x)/2) T_k(x) dx.
struct Moments<T> {
    ri: [T; 25],
    rj: [T; 25],
    rg: [T; 25],
    rh: [T; 25],
}

impl<T: Real> Moments<T> {
    fn new(alpha: T, beta: T) -> Self {
        let one = T::ONE;
        let two = T::from_f64(2.);
        let alfp1 = alpha + one;
        let betp1 = beta + one;
        let alfp2 = alpha + two;
        let betp2 = beta + two;
        let ralf = two.powf(alfp1);
        let rbet = two.powf(betp1);
        let mut ri = [T::ZERO; 25];
        let mut rj = [T::ZERO; 25];
        let mut rg = [T::ZERO; 25];
        let mut rh = [T::ZERO; 25];
        ri[0] = ralf / alfp1;
        rj[0] = rbet / betp1;
        ri[1] = ri[0] * alpha / alfp2;
        rj[1] = rj[0] * beta / betp2;
        let mut an = two;
        let mut anm1 = one;
        for i in 2..25 {
            ri[i] = -(ralf + an * (an - alfp2) * ri[i - 1])
                / (anm1 * (an + alfp1));
            rj[i] = -(rbet + an * (an - betp2) * rj[i - 1])
                / (anm1 * (an + betp1));
            anm1 = an;
            an += one;
        }
        rg[0] = -ri[0] / alfp1;
        rg[1] = -(ralf + ralf) / (alfp2 * alfp2) - rg[0];
        rh[0] = -rj[0] / betp1;
        rh[1] = -(rbet + rbet) / (betp2 * betp2) - rh[0];
        an = two;
        anm1 = one;
        for i in 2..25 {
            rg[i] = -(an * (an - alfp2) * rg[i - 1] - an * ri[i - 1]
                      + anm1 * ri[i]) / (anm1 * (an + alfp1));
            rh[i] = -(an * (an - betp2) * rh[i - 1] - an * rj[i - 1]
                      + anm1 * rj[i]) / (anm1 * (an + betp1));
            anm1 = an;
            an += one;
        }
        // The moments of (1-x)^β are those of (1+x)^β with T_k(-x).
        for i in (1..25).step_by(2) {
            rj[i] = -rj[i];
            rh[i] = -rh[i];
        }
        Moments { ri, rj, rg, rh }
    }
}

/// Table of cos(kπ/24), k = 0,…,47.
fn cos_table<T: Real>() -> [T; 48] {
    std::array::from_fn(|k| T::from_f64((k as f64 * PI / 24.).cos()))
}

/// Coefficients of the Chebyshev series of degree 12 and 24
/// interpolating the function whose values at cos(kπ/24),
/// k = 0,…,24, are given in `fval` (the first and last values
/// being halved).
fn chebyshev<T: Real>(fval: &[T; 25], cos: &[T; 48]) -> ([T; 13], [T; 25]) {
    let half = T::from_f64(0.5);
    let mut c24 = [T::ZERO; 25];
    for (k, c) in c24.iter_mut().enumerate() {
        let mut s = T::ZERO;
        for (j, &v) in fval.iter().enumerate() {
            s += v * cos[k * j % 48];
        }
        *c = s / T::from_f64(12.);
    }
    c24[0] *= half;
    c24[24] *= half;
    let mut c12 = [T::ZERO; 13];
    for (k, c) in c12.iter_mut().enumerate() {
        let mut s = T::ZERO;
        for j in 0..13 {
            s += fval[2 * j] * cos[2 * k * j % 48];
        }
        *c = s / T::from_f64(6.);
    }
    c12[0] *= half;
    c12[12] *= half;
    (c12, c24)
}

/// Sums of the Chebyshev series of degree 12 and 24 against the
/// moments `mom`.
fn moment_sums<T: Real>(c12: &[T; 13], c24: &[T; 25], mom: &[T; 25]) -> (T, T) {
    let mut res12 = T::ZERO;
    let mut res24 = T::ZERO;
    for i in 0..13 {
        res12 += c12[i] * mom[i];
        res24 += c24[i] * mom[i];
    }
    for i in 13..25 {
        res24 += c24[i] * mom[i];
    }
    (res12, res24)
}

/// The weight w(x) = (x-a)^α (b-x)^β [log(x-a)] [log(b-x)] and the
/// data needed to integrate against it.
struct AlgWeight<T> {
    a: T,
    b: T,
    alpha: T,
    beta: T,
    kind: Weight,
    moments: Moments<T>,
    cos: [T; 48],
}

impl<T: Real> AlgWeight<T> {
    fn new(a: T, b: T, alpha: T, beta: T, kind: Weight) -> Self {
        AlgWeight { a, b, alpha, beta, kind,
                    moments: Moments::new(alpha, beta),
                    cos: cos_table() }
    }

    fn eval(&self, x: T) -> T {
        let xma = x - self.a;
        let bmx = self.b - x;
        let w = xma.powf(self.alpha) * bmx.powf(self.beta);
        match self.kind {
            Weight::Alg => w,
            Weight::AlgLogA => w * xma.ln(),
            Weight::AlgLogB => w * bmx.ln(),
            Weight::AlgLog => w * xma.ln() * bmx.ln(),
        }
    }

    /// Integrate `g·w` on the panel \[`bl`, `br`\] ⊆ \[a, b\].  Return
    /// the estimates and the number of evaluations of `g`.
    ///
    /// A panel touching a singular end point is handled with a
    /// Clenshaw–Curtis rule: the smooth part of the integrand is
    /// interpolated by a Chebyshev series that is integrated exactly
    /// against the weight through the modified moments.  Other panels
    /// use the 15-point Gauss–Kronrod rule.
    fn panel<G, E>(&self, g: &mut G, bl: T, br: T)
                   -> Result<(Panel<T>, usize), Error<T, E>>
    where G: FnMut(T) -> Result<T, Error<T, E>> {
        let left = bl == self.a
            && (self.alpha != T::ZERO || self.kind.log_a());
        let right = br == self.b
            && (self.beta != T::ZERO || self.kind.log_b());
        if !left && !right {
            let p = GK15.apply(|x| g(x).map(|fx| fx * self.eval(x)),
                               bl, br)?;
            return Ok((p, 15))
        }
        let half = T::from_f64(0.5);
        let hlgth = half * (br - bl);
        let centr = half * (br + bl);
        // Values of the smooth part at centr + u.
        let mut smooth = |u: T| -> Result<T, Error<T, E>> {
            let fu = g(centr + u)?;
            if left {
                let y = self.b - centr - u;
                let v = fu * y.powf(self.beta);
                Ok(if self.kind.log_b() { v * y.ln() } else { v })
            } else {
                let y = centr - self.a + u;
                let v = fu * y.powf(self.alpha);
                Ok(if self.kind.log_a() { v * y.ln() } else { v })
            }
        };
        let mut fval = [T::ZERO; 25];
        fval[0] = half * smooth(hlgth)?;
        fval[12] = smooth(T::ZERO)?;
        fval[24] = half * smooth(-hlgth)?;
        for i in 1..12 {
            let u = hlgth * self.cos[i];
            fval[i] = smooth(u)?;
            fval[24 - i] = smooth(-u)?;
        }
        let (c12, c24) = chebyshev(&fval, &self.cos);
        let m = &self.moments;
        let (mom, mom_log, log_end, expo) =
            if left { (&m.ri, &m.rg, self.kind.log_a(), self.alpha) }
            else { (&m.rj, &m.rh, self.kind.log_b(), self.beta) };
        let (mut res12, mut res24) = moment_sums(&c12, &c24, mom);
        let mut result = T::ZERO;
        let mut abserr = T::ZERO;
        if log_end {
            let dc = (br - bl).ln();
            result = res24 * dc;
            abserr = ((res24 - res12) * dc).abs();
            (res12, res24) = moment_sums(&c12, &c24, mom_log);
        }
        let factor = hlgth.powf(expo + T::ONE);
        let result = (result + res24) * factor;
        let abserr = (abserr + (res24 - res12).abs()) * factor;
        Ok((Panel { result, abserr, resabs: T::ZERO, resasc: T::ZERO }, 25))
    }
}

/// Integrate f(x)·w(x) on the interval \[`a`, `b`\] where
/// w(x) = (x-a)^`alpha` (b-x)^`beta` (possibly multiplied by
/// logarithmic factors, see [`Qaws::weight`]).
///
/// The interval must satisfy `a < b` and the exponents must be > -1
/// (otherwise [`Error::InvalidInterval`] or [`Error::InvalidWeight`]
/// is returned).  The subintervals touching a singular end point are
/// handled by a modified Clenshaw–Curtis rule so the function `f`
/// itself should be smooth.
///
/// # Example
///
/// ```
/// use quad1d::qaws;
/// // ∫₀¹ √(1-x) dx = 2/3
/// let r = qaws(|_: f64| 1., 0., 1., 0., 0.5).integrate()?;
/// assert!((r.value - 2. / 3.).abs() < 1e-14);
/// # Ok::<(), quad1d::Error<f64>>(())
/// ```
#[must_use]
pub fn qaws<T, F, R>(
    f: F, a: T, b: T, alpha: T, beta: T,
) -> Qaws<T, F, T::DefaultTolerance, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    let mut q = Qaws::new(f, a, b);
    q.alpha = alpha;
    q.beta = beta;
    q
}

new_quadrature_method!(
    qaws,
    /// Adaptive integration with algebraic–logarithmic end-point
    /// weights (see [`qaws`]).
    Qaws,
    alpha: T = T::ZERO,
    beta: T = T::ZERO,
    kind: Weight = Weight::Alg);

impl<T, F, Tl, E> Qaws<T, F, Tl, E>
where Tl: Tolerance<T> {
    /// Set the logarithmic factors of the weight.
    pub fn weight(mut self, kind: Weight) -> Self {
        self.kind = kind;
        self
    }
}

impl<T, F, R, Tl> Qaws<T, F, Tl, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
    Tl: Tolerance<T>,
{
    /// Return the approximation of the integral and an estimate of
    /// its absolute error.
    pub fn integral(&mut self) -> Result<(T, T), Error<T, R::Error>> {
        let r = self.integrate()?;
        Ok((r.value, r.abserr))
    }

    /// Compute the integral and return it with details about the
    /// computation.  At least 2 subintervals are always used.
    pub fn integrate(&mut self) -> Result<Integral<T>, Error<T, R::Error>> {
        self.check_interval_bounds()?;
        let (a, b) = (self.a, self.b);
        if !(a < b) {
            return Err(Error::InvalidInterval { a, b })
        }
        let (alpha, beta) = (self.alpha, self.beta);
        if !(alpha > -T::ONE && beta > -T::ONE) {
            return Err(Error::InvalidWeight { alpha, beta })
        }
        let limit = self.limit.max(2);
        let w = AlgWeight::new(a, b, alpha, beta, self.kind);
        let mut g = |x: T| eval_float_result(&mut self.f, x);
        let eps = T::EPSILON;
        let half = T::from_f64(0.5);

        let centre = half * (a + b);
        let (p1, n1) = w.panel(&mut g, a, centre)?;
        let (p2, n2) = w.panel(&mut g, centre, b)?;
        let mut neval = n1 + n2;
        let mut area = p1.result + p2.result;
        let mut errsum = p1.abserr + p2.abserr;
        let mut part = Partition::new(a, b, area, errsum);
        part.split(a, centre, &p1, centre, b, &p2);
        part.sort(limit);
        let errbnd = self.tol.bound(area);
        if errsum <= errbnd {
            return finish(None, area, errsum, neval, 2)
        }
        if limit == 2 {
            return finish(Some(Flag::Limit), area, errsum, neval, 2)
        }

        let mut flag = None;
        let (mut iroff1, mut iroff2) = (0, 0);
        for last in 3..=limit {
            let maxerr = part.maxerr;
            let a1 = part.alist[maxerr];
            let b2 = part.blist[maxerr];
            let b1 = half * (a1 + b2);
            let a2 = b1;
            let errmax = part.errmax;
            let (q1, n1) = w.panel(&mut g, a1, b1)?;
            let (q2, n2) = w.panel(&mut g, a2, b2)?;
            neval += n1 + n2;
            let area12 = q1.result + q2.result;
            let erro12 = q1.abserr + q2.abserr;
            errsum = errsum + erro12 - errmax;
            area = area + area12 - part.rlist[maxerr];
            // Roundoff tests only for panels away from the end points.
            if a != a1 && b != b2
                && q1.resasc != q1.abserr && q2.resasc != q2.abserr {
                if (part.rlist[maxerr] - area12).abs()
                    < T::from_f64(1e-5) * area12.abs()
                    && erro12 >= T::from_f64(0.99) * errmax {
                    iroff1 += 1
                }
                if last > 10 && erro12 > errmax { iroff2 += 1 }
            }
            part.split(a1, b1, &q1, a2, b2, &q2);
            let errbnd = self.tol.bound(area);
            trace!(last, area = %area, errsum = %errsum, errbnd = %errbnd,
                   "bisected [{}, {}]", a1, b2);
            if errsum > errbnd {
                if last == limit { flag = Some(Flag::Limit) }
                if iroff1 >= 6 || iroff2 >= 20 {
                    flag = Some(Flag::Roundoff)
                }
                if a1.abs().max(b2.abs())
                    <= (T::ONE + T::from_f64(100.) * eps)
                    * (a2.abs() + T::from_f64(1000.) * T::UFLOW) {
                    flag = Some(Flag::BadIntegrand)
                }
            }
            part.sort(limit);
            if flag.is_some() || errsum <= errbnd { break }
        }
        finish(flag, part.sum(), errsum, neval, part.len())
    }
}

////////////////////////////////////////////////////////////////////////
//
// Elementary rules

pub mod rules {
    //! Elementary single-panel quadrature rules.
    //!
    //! These rules use one to three evaluations of the function and
    //! no error estimate.  They are mostly useful as a point of
    //! comparison for the adaptive methods.
    //!
    //! ```
    //! use quad1d::rules::Rule;
    //! let s = Rule::Simpson.apply(|x: f64| x * x * x, 0., 2.)?;
    //! assert_eq!(s, 4.);
    //! # Ok::<(), quad1d::Error<f64>>(())
    //! ```

    use std::fmt::{self, Display, Formatter};
    use super::{eval_float_result, Error, FloatOrError, Real};

    /// A single-panel rule on \[a, b\] with h = b - a and
    /// m = (a + b)/2.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Rule {
        /// f(a)·h
        LeftRectangle,
        /// f(b)·h
        RightRectangle,
        /// f(m)·h
        Midpoint,
        /// (f(a) + f(b))/2·h
        Trapezoid,
        /// (f(a) + 4f(m) + f(b))/6·h
        Simpson,
    }

    impl Rule {
        pub const ALL: [Rule; 5] = [
            Rule::LeftRectangle, Rule::RightRectangle, Rule::Midpoint,
            Rule::Trapezoid, Rule::Simpson];

        /// Short name of the rule.
        pub fn name(self) -> &'static str {
            match self {
                Rule::LeftRectangle => "LQuad",
                Rule::RightRectangle => "RQuad",
                Rule::Midpoint => "MQuad",
                Rule::Trapezoid => "Trapezoid",
                Rule::Simpson => "Simpson",
            }
        }

        /// Largest degree of the polynomials integrated exactly.
        pub fn degree(self) -> u32 {
            match self {
                Rule::LeftRectangle | Rule::RightRectangle => 0,
                Rule::Midpoint | Rule::Trapezoid => 1,
                Rule::Simpson => 3,
            }
        }

        /// Apply the rule to `f` on \[`a`, `b`\].
        pub fn apply<T, F, R>(self, mut f: F, a: T, b: T)
                              -> Result<T, Error<T, R::Error>>
        where
            T: Real,
            F: FnMut(T) -> R,
            R: FloatOrError<T>,
        {
            let h = b - a;
            let half = T::from_f64(0.5);
            let mid = half * (a + b);
            let mut f = |x: T| eval_float_result(&mut f, x);
            Ok(match self {
                Rule::LeftRectangle => f(a)? * h,
                Rule::RightRectangle => f(b)? * h,
                Rule::Midpoint => f(mid)? * h,
                Rule::Trapezoid => (f(a)? + f(b)?) * half * h,
                Rule::Simpson => {
                    let s = f(a)? + T::from_f64(4.) * f(mid)? + f(b)?;
                    s / T::from_f64(6.) * h
                }
            })
        }
    }

    impl Display for Rule {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.pad(self.name())
        }
    }
}

////////////////////////////////////////////////////////////////////////
//
// Tests

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($a: expr, $b: expr, $err: expr) => {
        let a = $a;
        let b = $b;
        if ! ((a.clone() - b.clone()).abs() <= $err) {
            panic!("|left - right| ≤ {:e}\n  left: {}\n right: {}",
                   $err, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fmt::{Debug, Display},
              f64::consts::PI};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rayon::prelude::*;
    use crate::{self as quad1d, NoError, Weight, rules::Rule};

    type R<T> = Result<(), quad1d::Error<T, NoError>>;

    #[test]
    fn error_is_static() {
        // Compile time test.
        fn _f<T>(x: T) -> Result<(), Box<dyn std::error::Error + 'static>>
        where T: Debug + Display + 'static + Clone {
            let fx = x.clone();
            Err(Box::new(quad1d::Error::<_, NoError>::NotFinite{x, fx}))
        }
    }

    #[test]
    fn kronrod_weights() {
        for gk in [&quad1d::GK15, &quad1d::GK21] {
            let n = gk.xgk.len() - 1;
            let sk: f64 = 2. * gk.wgk[..n].iter().sum::<f64>() + gk.wgk[n];
            assert_approx_eq!(sk, 2., 1e-15);
            let m = gk.wg.len();
            let sg: f64 = if gk.gauss_center {
                2. * gk.wg[..m - 1].iter().sum::<f64>() + gk.wg[m - 1]
            } else {
                2. * gk.wg.iter().sum::<f64>()
            };
            assert_approx_eq!(sg, 2., 1e-15);
        }
    }

    /// Random polynomial of degree `deg` and its antiderivative.
    fn random_poly(rng: &mut StdRng, deg: usize)
                   -> (Vec<f64>, impl Fn(f64) -> f64 + Clone) {
        let c: Vec<f64> = (0 ..= deg).map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let ci = c.clone();
        let prim = move |x: f64| {
            ci.iter().enumerate().rev()
                .fold(0., |s, (k, &ck)| s * x + ck / (k + 1) as f64) * x
        };
        (c, prim)
    }

    fn horner(c: &[f64], x: f64) -> f64 {
        c.iter().rev().fold(0., |s, &ck| s * x + ck)
    }

    #[test]
    fn gk21_polynomials() -> R<f64> {
        let mut rng = StdRng::seed_from_u64(748);
        for deg in [0, 1, 5, 12, 20, 31] {
            for _ in 0..5 {
                let (c, prim) = random_poly(&mut rng, deg);
                let a = rng.gen_range(-1.0..0.0);
                let b = rng.gen_range(0.5..1.0);
                let f = |x: f64| -> Result<f64, quad1d::Error<f64>> {
                    Ok(horner(&c, x)) };
                let p = quad1d::GK21.apply(f, a, b)?;
                assert_approx_eq!(p.result, prim(b) - prim(a), 1e-13);
            }
        }
        Ok(())
    }

    #[test]
    fn qags_polynomials_single_panel() -> R<f64> {
        let mut rng = StdRng::seed_from_u64(2024);
        for deg in 0..16 {
            let (c, prim) = random_poly(&mut rng, deg);
            let r = quad1d::qags(|x| horner(&c, x), 0., 1.).integrate()?;
            assert_eq!(r.subintervals, 1);
            assert_eq!(r.neval, 21);
            assert_approx_eq!(r.value, prim(1.) - prim(0.), 1e-14);
        }
        Ok(())
    }

    #[test]
    fn qags_sin() -> R<f64> {
        let (v, err) = quad1d::qags(|x: f64| x.sin(), 0., PI).integral()?;
        assert_approx_eq!(v, 2., err);
        Ok(())
    }

    #[test]
    fn qags_decr_bounds() -> R<f64> {
        let (v, err) = quad1d::qags(|x: f64| x.sin(), PI, 0.).integral()?;
        assert_approx_eq!(v, -2., err);
        Ok(())
    }

    #[test]
    fn qags_log_singularity() -> R<f64> {
        let r = quad1d::qags(|x: f64| x.ln() / x.sqrt(), 0., 1.)
            .integrate()?;
        assert_approx_eq!(r.value, -4., 1e-12);
        assert!(r.abserr < 1e-10);
        assert!(r.subintervals > 1);
        assert_eq!(r.neval, 42 * r.subintervals - 21);
        Ok(())
    }

    #[test]
    fn qags_algebraic_singularity() -> R<f64> {
        let r = quad1d::qags(|x: f64| x.powf(-0.9), 0., 1.).integrate()?;
        assert_approx_eq!(r.value, 10., 1e-6);
        Ok(())
    }

    #[test]
    fn qags_interior_singularity() -> R<f64> {
        let f = |x: f64| 1. / (x - 0.3).abs().sqrt();
        let exact = 2. * 0.3f64.sqrt() + 2. * 0.7f64.sqrt();
        let (v, _) = quad1d::qags(f, 0., 1.).limit(100).integral()?;
        assert_approx_eq!(v, exact, 1e-7);
        Ok(())
    }

    #[test]
    fn qags_oscillating() -> R<f64> {
        let f = |x: f64| (50. * x).sin().powi(2);
        let (v, err) = quad1d::qags(f, 0., PI).integral()?;
        assert_approx_eq!(v, PI / 2., err.max(1e-12));
        Ok(())
    }

    #[test]
    fn qags_divergent() {
        let r = quad1d::qags(|x: f64| 1. / x, 0., 1.).integrate();
        match r {
            Err(e) => assert!(e.estimate().is_some()),
            Ok(r) => panic!("∫₀¹ 1/x converged to {}", r.value),
        }
    }

    #[test]
    fn qags_limit() {
        let r = quad1d::qags(|x: f64| x.ln() / x.sqrt(), 0., 1.)
            .limit(1).integrate();
        assert!(matches!(r, Err(quad1d::Error::Limit {..})));
    }

    #[test]
    fn qags_f_nan() {
        let f = |x: f64| (x - 0.5).sqrt();
        assert!(matches!(quad1d::qags(f, 0., 1.).integrate(),
                         Err(quad1d::Error::NotFinite {x: _, fx: _})));
    }

    #[test]
    fn qags_infinite_bound() {
        let f = |x: f64| (-x).exp();
        assert!(matches!(quad1d::qags(f, 0., f64::INFINITY).integrate(),
                         Err(quad1d::Error::NotFinite {..})));
    }

    #[test]
    fn qags_fun_error() {
        let f = |x: f64| if x < 0.7 { Ok(x) } else { Err("out of domain") };
        match quad1d::qags(f, 0., 1.).integrate() {
            Err(quad1d::Error::Fun { x, err }) => {
                assert!(x >= 0.7);
                assert_eq!(err, "out of domain");
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn qags_tolerances() -> R<f64> {
        let f = |x: f64| x.ln() / x.sqrt();
        let (_, loose) = quad1d::qags(f, 0., 1.).rtol(1e-3).integral()?;
        let (v, tight) = quad1d::qags(f, 0., 1.).rtol(1e-10).atol(0.)
            .limit(0).integral()?;
        assert!(tight <= loose);
        assert_approx_eq!(v, -4., 1e-9);
        let (v, _) = quad1d::qags(f, 0., 1.)
            .tolerance(|i: f64| 1e-10 * i.abs()).integral()?;
        assert_approx_eq!(v, -4., 1e-9);
        Ok(())
    }

    #[test]
    fn tol_defaults() {
        use quad1d::{SetTolerances, Tol, Tolerance};
        let mut t = Tol::<f64>::default();
        t.set_rtol(-1.);
        t.set_atol(f64::NAN);
        assert_eq!(t.rtol, 1.49e-8);
        assert_eq!(t.atol, 1.49e-8);
        t.set_rtol(1e-20);
        assert_eq!(t.rtol, 50. * f64::EPSILON);
        t.set_atol(0.);
        assert_eq!(t.bound(2.), 100. * f64::EPSILON);
        assert_approx_eq!(Tol::<f32>::default().rtol, f32::EPSILON.sqrt(),
                          1e-9);
    }

    #[test]
    fn qags_f32() -> R<f32> {
        let (v, _) = quad1d::qags(|x: f32| x.sin(), 0., std::f32::consts::PI)
            .integral()?;
        assert_approx_eq!(v, 2f32, 1e-5);
        Ok(())
    }

    #[test]
    fn moments_closed_forms() {
        let m = quad1d::Moments::<f64>::new(0., 0.);
        for k in 0..25 {
            let exact = if k % 2 == 0 { 2. / (1. - (k * k) as f64) }
                        else { 0. };
            assert_approx_eq!(m.ri[k], exact, 1e-13);
            assert_approx_eq!(m.rj[k], exact, 1e-13);
        }
        // ∫₋₁¹ log((1±x)/2) dx = -2
        assert_approx_eq!(m.rg[0], -2., 1e-15);
        assert_approx_eq!(m.rh[0], -2., 1e-15);
        // ∫₋₁¹ (1+x)^α dx and ∫₋₁¹ x (1-x)^β dx
        let m = quad1d::Moments::<f64>::new(0.5, -0.5);
        assert_approx_eq!(m.ri[0], 2f64.powf(1.5) / 1.5, 1e-15);
        assert_approx_eq!(m.rj[1], 2f64.powf(1.5) / 3., 1e-14);
    }

    #[test]
    fn chebyshev_interpolation() {
        let cos = quad1d::cos_table::<f64>();
        let mut fval = [0.; 25];
        for (j, v) in fval.iter_mut().enumerate() {
            // T₅(cos(jπ/24))
            *v = (5. * j as f64 * PI / 24.).cos();
        }
        fval[0] *= 0.5;
        fval[24] *= 0.5;
        let (c12, c24) = quad1d::chebyshev(&fval, &cos);
        for k in 0..25 {
            assert_approx_eq!(c24[k], if k == 5 { 1. } else { 0. }, 1e-14);
        }
        for k in 0..13 {
            assert_approx_eq!(c12[k], if k == 5 { 1. } else { 0. }, 1e-14);
        }
    }

    #[test]
    fn qaws_chebyshev_weight() -> R<f64> {
        let (v, err) = quad1d::qaws(|_| 1., -1., 1., -0.5, -0.5)
            .integral()?;
        assert_approx_eq!(v, PI, err);
        Ok(())
    }

    #[test]
    fn qaws_weight_kinds() -> R<f64> {
        // ∫₀¹ (cos x + 2) x^-½ (1-x)^0.3 [log x] [log(1-x)] dx
        let f = |x: f64| x.cos() + 2.;
        let cases = [(Weight::Alg, 5.0016465159815319),
                     (Weight::AlgLogA, -11.459315472350524),
                     (Weight::AlgLogB, -2.162529698995501),
                     (Weight::AlgLog, 1.410408045616029)];
        for (kind, exact) in cases {
            let r = quad1d::qaws(f, 0., 1., -0.5, 0.3).weight(kind)
                .integrate()?;
            assert_approx_eq!(r.value, exact, r.abserr.max(1e-14));
            assert!(r.abserr < 1e-10);
        }
        Ok(())
    }

    #[test]
    fn qaws_without_singularity() -> R<f64> {
        let f = |x: f64| x.exp();
        let r = quad1d::qaws(f, 0., 1., 0., 0.).integrate()?;
        assert_eq!(r.neval, 30);
        assert_approx_eq!(r.value, 1f64.exp() - 1., r.abserr);
        Ok(())
    }

    #[test]
    fn qaws_oscillating() -> R<f64> {
        let r = quad1d::qaws(|x: f64| (30. * x).cos(), 0., 1., 0., 0.5)
            .integrate()?;
        assert!(r.subintervals > 2);
        assert_approx_eq!(r.value, -0.0038012433700810593, 1e-14);
        let (v, err) = quad1d::qags(|x: f64| (30. * x).cos()
                                    * (1. - x).sqrt(), 0., 1.)
            .integral()?;
        assert_approx_eq!(r.value, v, r.abserr + err);
        Ok(())
    }

    #[test]
    fn qaws_invalid() {
        let f = |x: f64| x;
        assert!(matches!(quad1d::qaws(f, 1., 1., 0., 0.).integrate(),
                         Err(quad1d::Error::InvalidInterval {..})));
        assert!(matches!(quad1d::qaws(f, 1., 0., 0., 0.).integrate(),
                         Err(quad1d::Error::InvalidInterval {..})));
        assert!(matches!(quad1d::qaws(f, 0., 1., -1., 0.).integrate(),
                         Err(quad1d::Error::InvalidWeight {..})));
        assert!(matches!(quad1d::qaws(f, 0., 1., 0., f64::NAN).integrate(),
                         Err(quad1d::Error::InvalidWeight {..})));
    }

    #[test]
    fn qaws_limit() {
        let f = |x: f64| (30. * x).cos();
        let r = quad1d::qaws(f, 0., 1., 0., 0.5).limit(1).integrate();
        // At least two subintervals are used.
        match r {
            Err(quad1d::Error::Limit { value, .. }) =>
                assert!(value.is_finite()),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn rules_exactness() -> R<f64> {
        let mut rng = StdRng::seed_from_u64(1);
        for rule in Rule::ALL {
            let (c, prim) = random_poly(&mut rng, rule.degree() as usize);
            let v = rule.apply(|x| horner(&c, x), 0.5, 2.)?;
            assert_approx_eq!(v, prim(2.) - prim(0.5), 1e-14);
        }
        assert_eq!(Rule::Trapezoid.to_string(), "Trapezoid");
        Ok(())
    }

    #[test]
    fn parallel_matches_sequential() {
        let betas: Vec<f64> = (0..64).map(|i| -0.9 + 0.05 * i as f64)
            .collect();
        let integrate = |&beta: &f64| {
            quad1d::qaws(|x: f64| (4.5 * x).sin() + 2., 1.3, 2.2, 0., beta)
                .integral().map_err(|e| e.to_string())
        };
        let seq: Vec<_> = betas.iter().map(integrate).collect();
        let par: Vec<_> = betas.par_iter().map(integrate).collect();
        assert_eq!(seq, par);
    }
}
