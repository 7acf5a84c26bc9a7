//! The five CRUD routes of one bound row model: `P` (search, create) and `P/:pkey` (read, update, delete).

use crate::handlers::entity::{create, delete as delete_handler, read, search, update};
use crate::model::RowModel;
use crate::state::EndpointState;
use axum::{routing::get, Router};

pub fn entity_routes<M: RowModel>(prefix: &str, state: EndpointState<M>) -> Router {
    let item_path = format!("{}/:pkey", prefix);
    Router::new()
        .route(prefix, get(search::<M>).post(create::<M>))
        .route(
            &item_path,
            get(read::<M>).put(update::<M>).delete(delete_handler::<M>),
        )
        .with_state(state)
}
