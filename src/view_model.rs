use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use crate::error::{FetchError, Result};
use crate::models::{Comment, User};
use crate::{ApiManager, Endpoint};

/// The terminal outcome of one fetch cycle
#[derive(Debug)]
pub enum FetchResult<T> {
    Success(Vec<T>),
    Failure(FetchError),
}

impl<T> FetchResult<T> {

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    pub fn into_result(self) -> Result<Vec<T>> {
        match self {
            FetchResult::Success(items) => Ok(items),
            FetchResult::Failure(err) => Err(err),
        }
    }

}

impl<T> From<Result<Vec<T>>> for FetchResult<T> {
    fn from(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => FetchResult::Success(items),
            Err(err) => FetchResult::Failure(err),
        }
    }
}

/// The receiving end of a single fetch cycle \
/// Yields exactly one [`FetchResult`], or `None` if the [`ListViewModel`] was gone by the time the result arrived.
/// Consumed on receive, so it can never be reused for another cycle.
#[must_use = "The outcome of the fetch cycle is only observable through its subscription"]
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: oneshot::Receiver<FetchResult<T>>,
}

impl<T> Subscription<T> {

    pub async fn recv(self) -> Option<FetchResult<T>> {
        self.receiver.await.ok()
    }

}

#[derive(Debug)]
struct Shared {
    api: ApiManager,
    endpoint: Endpoint,
    disposed: AtomicBool,
}

/// Fetches a list of `T` from an [`Endpoint`] and publishes the outcome \
/// Every call to [`fetch()`](Self::fetch) is an independent cycle with its own [`Subscription`].
/// Cycles are neither deduplicated nor cancelled: an in-flight request always completes,
/// but its result is dropped once the view-model has been [disposed](Self::dispose) or dropped.
#[derive(Debug)]
pub struct ListViewModel<T> {
    shared: Arc<Shared>,
    _items: PhantomData<fn() -> T>,
}

pub type UsersViewModel = ListViewModel<User>;

impl<T: DeserializeOwned + Send + 'static> ListViewModel<T> {

    pub fn new(api: ApiManager, endpoint: Endpoint) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                endpoint,
                disposed: AtomicBool::new(false),
            }),
            _items: PhantomData,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.shared.endpoint
    }

    /// Starts a new fetch cycle on the current tokio runtime. \
    /// Returns immediately; the outcome is delivered through the returned [`Subscription`].
    pub fn fetch(&self) -> Subscription<T> {
        let (sender, receiver) = oneshot::channel();
        let api = self.shared.api.clone();
        let endpoint = self.shared.endpoint;
        let view_model = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let result = api.fetch_items::<T>(endpoint.url()).await;
            let Some(view_model) = view_model.upgrade().filter(|shared| !shared.is_disposed()) else {
                log::debug!("Discarding result for {:?}, view-model is gone", endpoint);
                return;
            };
            if let Err(err) = &result {
                log::debug!("Fetch from {:?} failed: {}", view_model.endpoint, err);
            }
            if sender.send(result.into()).is_err() {
                log::debug!("Subscriber for {:?} dropped before the result arrived", view_model.endpoint);
            }
        });
        Subscription { receiver }
    }

    /// Drops the results of all cycles that are still in flight
    pub fn dispose(&self) {
        self.shared.disposed.store(true, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

}

impl Shared {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl ListViewModel<User> {
    pub fn fetch_users(&self) -> Subscription<User> {
        self.fetch()
    }
}

impl ListViewModel<Comment> {
    pub fn fetch_comments(&self) -> Subscription<Comment> {
        self.fetch()
    }
}
