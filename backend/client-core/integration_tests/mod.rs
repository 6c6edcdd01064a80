mod helpers;

mod auth_gating;
mod bulk_delete;
mod codec_round_trip;
mod config;
mod dispatch;
mod generators;
mod lifecycle;
mod scenario;
mod tenant_scoping;
