//! API clients for external services (NHTSA vPIC)

pub mod nhtsa;

pub use nhtsa::{
    extract_cylinder_count, extract_displacement, extract_engine_model, DecodedVariable,
    VinDecoder,
};
