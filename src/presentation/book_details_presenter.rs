use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::books::command::view_book_details_cmd::{ViewBookDetailsCommandRequest, ViewBookDetailsCommandResponse};
use crate::core::command::Command;
use crate::presentation::binding::BookBinding;
use crate::presentation::view_state::{ViewError, ViewState};

const NOT_FOUND_MESSAGE: &str = "Book not found";

type DetailsCommand = dyn Command<ViewBookDetailsCommandRequest, ViewBookDetailsCommandResponse>;

// Maps a book-id input to the LOADING / SUCCESS / ERROR render state. The
// state lives in a single watch slot so renderers always see the latest
// value; it persists across subscription restarts until replaced. Loading a
// new id aborts the previous watcher, which detaches its feed listener.
pub struct BookDetailsPresenter {
    details: Arc<DetailsCommand>,
    state: Arc<watch::Sender<ViewState<BookBinding>>>,
    requested: Mutex<Option<String>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl BookDetailsPresenter {
    pub fn new(details: Arc<DetailsCommand>) -> Self {
        let (state, _) = watch::channel(ViewState::loading());
        Self {
            details,
            state: Arc::new(state),
            requested: Mutex::new(None),
            watcher: Mutex::new(None),
        }
    }

    /// Render-side handle to the latest view state.
    pub fn state(&self) -> watch::Receiver<ViewState<BookBinding>> {
        self.state.subscribe()
    }

    // Re-requesting the id already being shown (or loaded) is a no-op; the
    // live feed keeps that state current on its own.
    pub fn load_book(&self, book_id: &str) {
        {
            let mut requested = lock(&self.requested);
            if requested.as_deref() == Some(book_id) {
                return;
            }
            *requested = Some(book_id.to_string());
        }
        if let Some(watcher) = lock(&self.watcher).take() {
            watcher.abort();
        }
        let _ = self.state.send(ViewState::loading());

        let details = self.details.clone();
        let state = self.state.clone();
        let request = ViewBookDetailsCommandRequest::new(book_id);
        let watcher = tokio::spawn(async move {
            match details.execute(request).await {
                Ok(ViewBookDetailsCommandResponse { mut feed }) => {
                    while let Some(emission) = feed.recv().await {
                        match emission {
                            Ok(Some(book)) => {
                                let _ = state.send(ViewState::success(BookBinding::from(&book)));
                            }
                            Ok(None) => {
                                let _ = state.send(ViewState::error(
                                    ViewError::not_found(NOT_FOUND_MESSAGE)));
                            }
                            Err(err) => {
                                let _ = state.send(ViewState::error(ViewError::from(err)));
                                break;
                            }
                        }
                    }
                }
                Err(err) => {
                    let _ = state.send(ViewState::error(ViewError::from(err)));
                }
            }
        });
        *lock(&self.watcher) = Some(watcher);
    }
}

impl Drop for BookDetailsPresenter {
    // view teardown must not leak the feed listener
    fn drop(&mut self) {
        if let Some(watcher) = lock(&self.watcher).take() {
            watcher.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::time::timeout;
    use crate::books::command::view_book_details_cmd::ViewBookDetailsCommand;
    use crate::books::domain::model::Book;
    use crate::books::repository::store_books_repository::StoreBooksRepository;
    use crate::books::repository::BooksRepository;
    use crate::core::domain::Configuration;
    use crate::presentation::binding::BookBinding;
    use crate::presentation::book_details_presenter::BookDetailsPresenter;
    use crate::presentation::view_state::{Status, ViewError, ViewState};
    use crate::store::memory_blob_store::MemoryBlobStore;
    use crate::store::memory_document_store::MemoryDocumentStore;
    use crate::store::session::Session;

    struct Fixture {
        documents: Arc<MemoryDocumentStore>,
        repository: Arc<dyn BooksRepository>,
        presenter: BookDetailsPresenter,
    }

    fn fixture() -> Fixture {
        let documents = Arc::new(MemoryDocumentStore::new());
        let session = Session::new();
        session.sign_in("user-view");
        let repository: Arc<dyn BooksRepository> = Arc::new(StoreBooksRepository::new(
            &Configuration::new(),
            documents.clone(),
            Arc::new(MemoryBlobStore::new()),
            Arc::new(session)));
        let presenter = BookDetailsPresenter::new(
            Arc::new(ViewBookDetailsCommand::new(repository.clone())));
        Fixture { documents, repository, presenter }
    }

    async fn await_status(rx: &mut watch::Receiver<ViewState<BookBinding>>,
                          status: Status) -> ViewState<BookBinding> {
        timeout(Duration::from_secs(5), async {
            loop {
                let current = rx.borrow_and_update().clone();
                if current.status == status {
                    return current;
                }
                rx.changed().await.expect("state channel should stay open");
            }
        }).await.expect("should reach expected status")
    }

    #[tokio::test]
    async fn test_should_start_in_loading_state() {
        let fixture = fixture();
        assert_eq!(Status::Loading, fixture.presenter.state().borrow().status);
    }

    #[tokio::test]
    async fn test_should_present_book_details() {
        let fixture = fixture();
        let mut book = Book::new("Clean Code", "Uncle Bob");
        book.rating = 5.0;
        fixture.repository.save(&mut book).await.expect("should save book");

        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book(book.id.as_str());
        let state = await_status(&mut rx, Status::Success).await;
        let binding = state.data.expect("should carry binding");
        assert_eq!(book.id, binding.id);
        assert_eq!("Clean Code", binding.title.as_str());
    }

    #[tokio::test]
    async fn test_should_present_not_found_for_missing_book() {
        let fixture = fixture();
        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book("missing-id");
        let state = await_status(&mut rx, Status::Error).await;
        assert_eq!(Some(ViewError::not_found("Book not found")), state.error);
    }

    #[tokio::test]
    async fn test_should_follow_live_updates() {
        let fixture = fixture();
        let mut book = Book::new("Clean Code", "Uncle Bob");
        fixture.repository.save(&mut book).await.expect("should save book");

        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book(book.id.as_str());
        let _ = await_status(&mut rx, Status::Success).await;

        fixture.repository.remove(&book).await.expect("should remove book");
        let state = await_status(&mut rx, Status::Error).await;
        assert_eq!(Some(ViewError::not_found("Book not found")), state.error);
    }

    #[tokio::test]
    async fn test_should_not_reload_same_book_id() {
        let fixture = fixture();
        let mut book = Book::new("Clean Code", "Uncle Bob");
        fixture.repository.save(&mut book).await.expect("should save book");

        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book(book.id.as_str());
        let _ = await_status(&mut rx, Status::Success).await;

        fixture.presenter.load_book(book.id.as_str());
        tokio::time::sleep(Duration::from_millis(50)).await;
        // no new LOADING emission, no resubscription
        assert!(!rx.has_changed().expect("state channel should stay open"));
        assert_eq!(Status::Success, rx.borrow().status);
    }

    #[tokio::test]
    async fn test_should_switch_to_other_book_id() {
        let fixture = fixture();
        let mut first = Book::new("Clean Code", "Uncle Bob");
        let mut second = Book::new("Refactoring", "Martin Fowler");
        fixture.repository.save(&mut first).await.expect("should save book");
        fixture.repository.save(&mut second).await.expect("should save book");

        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book(first.id.as_str());
        let _ = await_status(&mut rx, Status::Success).await;

        fixture.presenter.load_book(second.id.as_str());
        let state = timeout(Duration::from_secs(5), async {
            loop {
                rx.changed().await.expect("state channel should stay open");
                let current = rx.borrow_and_update().clone();
                if current.status == Status::Success
                    && current.data.as_ref().map(|b| b.id.as_str()) == Some(second.id.as_str()) {
                    return current;
                }
            }
        }).await.expect("should present second book");
        assert_eq!("Refactoring", state.data.expect("should carry binding").title.as_str());
    }

    #[tokio::test]
    async fn test_should_present_terminal_error_on_listener_failure() {
        let fixture = fixture();
        let mut book = Book::new("Clean Code", "Uncle Bob");
        fixture.repository.save(&mut book).await.expect("should save book");

        let mut rx = fixture.presenter.state();
        fixture.presenter.load_book(book.id.as_str());
        let _ = await_status(&mut rx, Status::Success).await;

        fixture.documents.set_offline(true);
        let state = await_status(&mut rx, Status::Error).await;
        let error = state.error.expect("should carry error");
        assert!(matches!(error, ViewError::Failed { .. }));
        assert!(error.retryable());
    }
}
