mod result_ext;
pub use result_ext::*;

mod callback;
pub use callback::*;
