//! Backend API contracts and the typed endpoint registry.
//!
//! Each endpoint is a zero-sized type implementing [`Endpoint`]; its
//! argument and result types are fixed by the trait impl, and the
//! [`EndpointRegistry`] maps endpoint names to those definitions.

mod endpoint;
pub mod endpoints;
mod error;
mod registry;
mod types;

pub use endpoint::{ApiRequest, Endpoint, EndpointKind, HttpMethod, Tag};
pub use error::ApiError;
pub use registry::{EndpointRegistry, InjectOptions, RegistryError};
pub use types::{
    ApiResponse, DashboardArgs, DashboardData, DashboardPeriod, DashboardStats, ErrorEnvelope,
    LoginRequest, LoginResponse, User, UserChanges, UserList, UserUpdate, UsersArgs,
};
