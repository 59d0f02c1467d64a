pub mod routing;
pub mod tomtom;

pub use routing::{DynRouting, Matrix, MatrixCell, RoutingService};
pub use tomtom::{TomTomClient, TomTomClientParams};
