mod coordinates;
mod layer;
mod map_options;
mod marker;
mod route;
mod session;

pub use coordinates::{parse_component, Coordinates};
pub use layer::{Layer, LinePaint, Source};
pub use map_options::{Control, MapOptions, StylesVisibility};
pub use marker::{Marker, MarkerKind, Popup};
pub use route::{Leg, Route, RouteSummary};
pub use session::{Recomputation, Session, Status as SessionStatus};
