use axum::Router;

pub mod ledger;
pub mod system;

pub fn router() -> Router {
    Router::new().merge(ledger::router()).merge(system::router())
}
