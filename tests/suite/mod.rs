mod identity;
mod record_flow;
