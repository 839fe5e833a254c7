use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use crate::error::FetchError;
use crate::models::{Comment, User};
use crate::view_model::{FetchResult, ListViewModel, Subscription};

/// The two lines shown for a single list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub subtitle: String,
}

/// A record that can be shown as a [`Row`]
pub trait RowPresentable {
    fn row(&self) -> Row;
}

impl RowPresentable for User {
    fn row(&self) -> Row {
        Row { title: self.name.clone(), subtitle: self.email.clone() }
    }
}

impl RowPresentable for Comment {
    fn row(&self) -> Row {
        Row { title: self.name.clone(), subtitle: self.email.clone() }
    }
}

/// What a list renderer queries to draw itself
pub trait TableDataSource {
    fn row_count(&self) -> usize;
    /// `None` if `index` is out of bounds
    fn row_at(&self, index: usize) -> Option<Row>;
}

/// An update for the table, that has to be applied by the thread that owns it
#[derive(Debug)]
pub enum TableUpdate<T> {
    Reload(Vec<T>),
    Failed(FetchError),
    /// The view-model was gone when the result arrived, the rows stay as they are
    Discarded,
}

/// Posts work onto a [`MainQueue`] from any thread
#[derive(Debug)]
pub struct MainQueueHandle<M> {
    sender: mpsc::UnboundedSender<M>,
}

impl<M> Clone for MainQueueHandle<M> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<M> MainQueueHandle<M> {

    /// Returns `false` if the queue is gone
    pub fn post(&self, message: M) -> bool {
        self.sender.send(message).is_ok()
    }

}

/// The queue of the single thread that renders \
/// Asynchronous completions [post](MainQueueHandle::post) to it, the owner drains it.
#[derive(Debug)]
pub struct MainQueue<M> {
    sender: mpsc::UnboundedSender<M>,
    receiver: mpsc::UnboundedReceiver<M>,
}

impl<M> Default for MainQueue<M> {
    fn default() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }
}

impl<M> MainQueue<M> {

    pub fn handle(&self) -> MainQueueHandle<M> {
        MainQueueHandle { sender: self.sender.clone() }
    }

    /// Waits until something was posted. Never yields `None` while the queue is alive
    pub async fn next(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<M> {
        self.receiver.try_recv().ok()
    }

}

/// Binds a [`ListViewModel`] to a list of rows \
/// The rows only ever change on the thread that calls [`process_next_update()`](Self::process_next_update),
/// no matter on which thread a fetch completes. A failed fetch is logged and keeps the previous rows.
#[derive(Debug)]
pub struct TableController<T> {
    view_model: ListViewModel<T>,
    items: Vec<T>,
    queue: MainQueue<TableUpdate<T>>,
    last_error: Option<FetchError>,
}

pub type UsersTableController = TableController<User>;

impl<T: RowPresentable + DeserializeOwned + Send + 'static> TableController<T> {

    pub fn new(view_model: ListViewModel<T>) -> Self {
        Self {
            view_model,
            items: vec![],
            queue: MainQueue::default(),
            last_error: None,
        }
    }

    pub fn view_model(&self) -> &ListViewModel<T> {
        &self.view_model
    }

    pub fn view_did_load(&mut self) {
        self.refresh();
    }

    /// Starts a new fetch cycle. The rows are updated once its result has been processed
    pub fn refresh(&self) {
        let subscription = self.view_model.fetch();
        self.observe(subscription);
    }

    fn observe(&self, subscription: Subscription<T>) {
        let main_queue = self.queue.handle();
        tokio::spawn(async move {
            let update = match subscription.recv().await {
                Some(FetchResult::Success(items)) => TableUpdate::Reload(items),
                Some(FetchResult::Failure(err)) => TableUpdate::Failed(err),
                None => TableUpdate::Discarded,
            };
            if !main_queue.post(update) {
                log::debug!("Table is gone, dropping update");
            }
        });
    }

    fn apply(&mut self, update: TableUpdate<T>) {
        match update {
            TableUpdate::Reload(items) => {
                log::debug!("Reloading table with {} rows", items.len());
                self.items = items;
                self.last_error = None;
            }
            TableUpdate::Failed(err) => {
                log::error!("{}", err);
                self.last_error = Some(err);
            }
            TableUpdate::Discarded => log::debug!("Fetch cycle was discarded, keeping {} rows", self.items.len()),
        }
    }

    /// Waits for the next finished fetch cycle and applies it. \
    /// A discarded cycle counts as finished. Waits forever if no cycle is in flight.
    pub async fn process_next_update(&mut self) {
        if let Some(update) = self.queue.next().await {
            self.apply(update);
        }
    }

    /// Applies every finished fetch cycle without waiting. Returns how many were applied
    pub fn process_pending_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Some(update) = self.queue.try_next() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The error of the last processed cycle, if it failed
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<FetchError> {
        self.last_error.take()
    }

}

impl<T: RowPresentable> TableDataSource for TableController<T> {

    fn row_count(&self) -> usize {
        self.items.len()
    }

    fn row_at(&self, index: usize) -> Option<Row> {
        self.items.get(index).map(RowPresentable::row)
    }

}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use mockito::Server;
    use reqwest::Client;
    use url::Url;
    use super::*;
    use crate::test_support::{refused_origin, LEANNE};
    use crate::{ApiManager, Endpoint, UsersViewModel};

    const TWO_USERS: &str = r#"[
        {"id":1,"name":"Leanne Graham","email":"Sincere@april.biz"},
        {"id":2,"name":"Ervin Howell","email":"Shanna@melissa.tv"}
    ]"#;

    fn controller(origin: Url) -> UsersTableController {
        let api = ApiManager::with_client(Client::new()).with_origin(origin);
        UsersTableController::new(UsersViewModel::new(api, Endpoint::UsersFetch))
    }

    async fn wait_for_pending(controller: &UsersTableController, count: usize) {
        tokio::time::timeout(Duration::from_secs(10), async {
            while controller.queue.receiver.len() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
            .await
            .unwrap();
    }

    async fn process(controller: &mut UsersTableController) {
        tokio::time::timeout(Duration::from_secs(10), controller.process_next_update())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn renders_one_row_per_user() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .with_body(LEANNE)
            .create_async()
            .await;

        let mut controller = controller(Url::parse(&server.url()).unwrap());
        assert_eq!(controller.row_count(), 0);
        controller.view_did_load();
        process(&mut controller).await;

        assert_eq!(controller.row_count(), 1);
        assert_eq!(controller.row_at(0), Some(Row {
            title: "Leanne Graham".to_string(),
            subtitle: "Sincere@april.biz".to_string(),
        }));
        assert_eq!(controller.row_at(1), None);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn failure_keeps_previous_rows() {
        let mut server = Server::new_async().await;
        let good = server
            .mock("GET", "/users")
            .with_body(TWO_USERS)
            .create_async()
            .await;

        let mut controller = controller(Url::parse(&server.url()).unwrap());
        controller.view_did_load();
        process(&mut controller).await;
        assert_eq!(controller.row_count(), 2);
        good.remove_async().await;

        let _broken = server
            .mock("GET", "/users")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;
        controller.refresh();
        process(&mut controller).await;

        assert_eq!(controller.row_count(), 2);
        assert_eq!(controller.row_at(1).unwrap().title, "Ervin Howell");
        assert!(controller.take_last_error().unwrap().is_decode());
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn transport_failure_leaves_table_empty() {
        let mut controller = controller(refused_origin());
        controller.view_did_load();
        process(&mut controller).await;
        assert_eq!(controller.row_count(), 0);
        assert!(controller.last_error().unwrap().is_transport());
    }

    #[tokio::test]
    async fn updates_wait_for_the_owner() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .with_body(LEANNE)
            .create_async()
            .await;

        let mut controller = controller(Url::parse(&server.url()).unwrap());
        controller.view_did_load();
        assert_eq!(controller.process_pending_updates(), 0);
        // Let the cycle complete without draining the queue
        wait_for_pending(&controller, 1).await;
        assert_eq!(controller.row_count(), 0);
        assert_eq!(controller.process_pending_updates(), 1);
        assert_eq!(controller.row_count(), 1);
    }

    #[tokio::test]
    async fn disposed_cycle_does_not_block_the_owner() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .with_body(LEANNE)
            .create_async()
            .await;

        let mut controller = controller(Url::parse(&server.url()).unwrap());
        controller.view_did_load();
        controller.view_model().dispose();
        process(&mut controller).await;
        assert_eq!(controller.row_count(), 0);
        assert!(controller.last_error().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn last_processed_cycle_decides_the_rows() {
        let mut server = Server::new_async().await;
        let two = server
            .mock("GET", "/users")
            .with_body(TWO_USERS)
            .create_async()
            .await;

        let mut controller = controller(Url::parse(&server.url()).unwrap());
        controller.refresh();
        wait_for_pending(&controller, 1).await;
        two.remove_async().await;

        let _one = server
            .mock("GET", "/users")
            .with_body(LEANNE)
            .create_async()
            .await;
        controller.refresh();
        wait_for_pending(&controller, 2).await;

        assert_eq!(controller.process_pending_updates(), 2);
        assert_eq!(controller.row_count(), 1);
        assert_eq!(controller.row_at(0).unwrap().title, "Leanne Graham");
    }

    #[test]
    fn comments_render_name_and_email() {
        let comment = Comment {
            post_id: 1,
            id: 1,
            name: "id labore ex et quam laborum".to_string(),
            email: "Eliseo@gardner.biz".to_string(),
            body: "laudantium".to_string(),
        };
        assert_eq!(comment.row(), Row {
            title: "id labore ex et quam laborum".to_string(),
            subtitle: "Eliseo@gardner.biz".to_string(),
        });
    }

    #[tokio::test]
    async fn main_queue_handle_reports_closed_queue() {
        let queue = MainQueue::<u8>::default();
        let handle = queue.handle();
        assert!(handle.clone().post(1));
        drop(queue);
        assert!(!handle.post(2));
    }
}
