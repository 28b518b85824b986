//! Algorithms that search for local minima of functions along multiple dimensions.

mod box_method;
mod constrained;
mod coordinate_descent;
mod descent;
mod gradient_descent;
mod hooke_jeeves;
mod line_search;
mod nelder_mead;
mod newton_raphson;
mod simplex;

pub use self::box_method::{BoxMethod, BoxMethodBuilder, BoxMethodBuilderError};
pub use self::constrained::ConstrainedOptimizer;
pub use self::coordinate_descent::{
    CoordinateDescent, CoordinateDescentBuilder, CoordinateDescentBuilderError,
};
pub use self::gradient_descent::{
    GradientDescent, GradientDescentBuilder, GradientDescentBuilderError,
};
pub use self::hooke_jeeves::{HookeJeeves, HookeJeevesBuilder, HookeJeevesBuilderError};
pub use self::line_search::LineSearch;
pub use self::nelder_mead::{NelderMead, NelderMeadBuilder, NelderMeadBuilderError};
pub use self::newton_raphson::{NewtonRaphson, NewtonRaphsonBuilder, NewtonRaphsonBuilderError};
