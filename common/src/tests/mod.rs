mod backend_error_code;
mod redacted_token;
