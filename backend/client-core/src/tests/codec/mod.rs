mod command;
mod response;
mod settings;
