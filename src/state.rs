//! Per-endpoint router state.

use crate::model::RowModel;
use crate::service::DataAccess;
use crate::session::SessionFactory;
use std::sync::Arc;

/// State shared by the five routes of one bound model.
pub struct EndpointState<M> {
    pub sessions: SessionFactory,
    pub api: Arc<DataAccess<M>>,
}

impl<M> Clone for EndpointState<M> {
    fn clone(&self) -> Self {
        EndpointState {
            sessions: self.sessions.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<M: RowModel> EndpointState<M> {
    pub fn new(sessions: SessionFactory, api: Arc<DataAccess<M>>) -> Self {
        EndpointState { sessions, api }
    }
}
