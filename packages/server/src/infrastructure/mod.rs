//! Infrastructure layer: concrete implementations of the domain's
//! repository and message pusher traits, plus the wire/HTTP DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
