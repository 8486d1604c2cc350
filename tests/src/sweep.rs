mod cancellation;
mod integration;
