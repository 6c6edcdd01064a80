mod delete;
mod secret;
