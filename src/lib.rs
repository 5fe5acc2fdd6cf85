//! transmute: a registry of tagged, single-step conversion functions
//! ("reagents") that composes them on demand into a least-cost chain
//! converting a given input into a requested output.
//!
//! ```
//! use transmute::{Lab, ReagentFailure, Substance, TagState, TransmuteRequest};
//! use transmute::value::{unwrap, wrap};
//!
//! let mut lab = Lab::new();
//! let a = Substance::of("A");
//! let b = Substance::of("B");
//! lab.stock_reagent(1.0, a, TagState::new(), b, TagState::new(), Box::new(|v| {
//!     let s = unwrap::<String>(v).map_err(|_| ReagentFailure::new("TypeError", "expected String"))?;
//!     Ok(wrap(format!("{s} -> AtoB")))
//! }));
//!
//! let result = lab.transmute("start".to_string(), TransmuteRequest::new(b).src_cat(a)).unwrap();
//! assert_eq!(unwrap::<String>(result).unwrap(), "start -> AtoB");
//! ```

pub mod activator;
pub mod activator_table;
pub mod config;
pub mod error;
pub mod lab;
pub mod reagent;
pub mod reagent_table;
pub mod request;
pub mod substance;
pub mod value;
pub mod variation;

pub use config::TransmuteConfig;
pub use error::{LabError, ReagentFailure};
pub use lab::Lab;
pub use reagent::ReagentId;
pub use request::TransmuteRequest;
pub use substance::Substance;
pub use variation::{TagState, Variation};
