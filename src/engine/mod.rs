mod stroke;
pub use stroke::*;

mod sampler;
pub use sampler::*;

mod trace;
pub use trace::*;

mod targets;
pub use targets::*;

mod session;
pub use session::*;
