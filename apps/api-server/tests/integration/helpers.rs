use std::sync::{Arc, Once};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

use api_server::{AppConfig, AppState, Application, RunningServer};
use blog_core::domain::{NewPost, PartialAuthor};
use blog_core::ports::PostRepository;
use blog_infra::database::InMemoryPostRepository;
use blog_shared::dto::{AuthorPayload, CreatePostRequest};

pub const SEED_COUNT: usize = 10;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "labore", "magna", "aliqua", "veniam", "nostrud",
];
const FIRST_NAMES: &[&str] = &["Ada", "Grace", "Alan", "Edsger", "Barbara", "Ken", "Frances"];
const LAST_NAMES: &[&str] = &["Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Thompson"];

/// The store a test run owns. Dropped wholesale at teardown.
enum TestStore {
    Memory(Arc<InMemoryPostRepository>),
    #[cfg(feature = "postgres")]
    Postgres(Arc<blog_infra::database::PostgresPostRepository>),
}

impl TestStore {
    async fn drop_all(&self) {
        tracing::warn!("Deleting test data");
        match self {
            TestStore::Memory(repo) => repo.clear().await,
            #[cfg(feature = "postgres")]
            TestStore::Postgres(repo) => {
                repo.clear().await.expect("Failed to clear the test database");
            }
        }
    }
}

#[cfg(feature = "postgres")]
static DATABASE_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    /// Direct access to the store, bypassing HTTP.
    pub posts: Arc<dyn PostRepository>,
    store: TestStore,
    state: AppState,
    server: RunningServer,
    #[cfg(feature = "postgres")]
    _db_guard: Option<tokio::sync::MutexGuard<'static, ()>>,
}

impl TestApp {
    /// Acquire an isolated store, seed it, and start a server on a random port.
    ///
    /// Runs against the in-memory store unless `TEST_DATABASE_URL` is set, in
    /// which case tests share that database one at a time.
    pub async fn spawn() -> Self {
        Self::init_telemetry();

        let mut config = AppConfig::from_env();
        config.port = 0;

        #[cfg(feature = "postgres")]
        let (store, state, guard) = if std::env::var("TEST_DATABASE_URL").is_ok() {
            let guard = DATABASE_LOCK.lock().await;
            let (store, state) = Self::postgres_store(&config).await;
            (store, state, Some(guard))
        } else {
            let (store, state) = Self::memory_store();
            (store, state, None)
        };

        #[cfg(not(feature = "postgres"))]
        let (store, state) = Self::memory_store();

        let posts = state.posts.clone();
        store.drop_all().await;
        seed_post_data(posts.as_ref()).await;

        let server = Application::build(&config, state.clone())
            .expect("Failed to build the application")
            .start();

        TestApp {
            address: format!("http://{}:{}", config.host, server.port()),
            client: reqwest::Client::new(),
            posts,
            store,
            state,
            server,
            #[cfg(feature = "postgres")]
            _db_guard: guard,
        }
    }

    /// Drop all test data, stop the server and release the store.
    pub async fn teardown(self) {
        let TestApp {
            posts,
            store,
            state,
            server,
            ..
        } = self;

        store.drop_all().await;
        server.stop().await.expect("Failed to stop the server");
        drop((posts, store));
        state.close().await;
    }

    fn memory_store() -> (TestStore, AppState) {
        let repo = Arc::new(InMemoryPostRepository::new());
        let state = AppState::in_memory(repo.clone());
        (TestStore::Memory(repo), state)
    }

    #[cfg(feature = "postgres")]
    async fn postgres_store(config: &AppConfig) -> (TestStore, AppState) {
        use blog_infra::database::{DatabaseConfig, DatabaseConnections, PostgresPostRepository};
        use migration::{Migrator, MigratorTrait};

        let connections = DatabaseConnections::init(&DatabaseConfig::new(
            config.test_database_url.clone(),
        ))
        .await
        .expect("Failed to connect to the test database");
        let repo = Arc::new(PostgresPostRepository::from(connections));
        Migrator::up(repo.connection(), None)
            .await
            .expect("Failed to migrate the test database");

        let state = AppState::postgres(repo.clone());
        (TestStore::Postgres(repo), state)
    }

    fn init_telemetry() {
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")),
                    )
                    .finish();
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }
}

/// Convenient methods for calling the API under test.
impl TestApp {
    pub async fn get_posts(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/posts", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_post(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/posts/{}", &self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_post<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.client
            .post(format!("{}/posts", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_post<Body>(&self, id: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.client
            .put(format!("{}/posts/{}", &self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_post(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}/posts/{}", &self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// A random, fully populated create request.
pub fn generate_post_data() -> CreatePostRequest {
    let mut rng = rand::thread_rng();

    let mut words = |count: usize| {
        (0..count)
            .map(|_| *WORDS.choose(&mut rng).unwrap())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let title = words(6);
    let content = words(40);

    CreatePostRequest {
        title: Some(title),
        author: Some(AuthorPayload {
            first_name: Some(FIRST_NAMES.choose(&mut rng).unwrap().to_string()),
            last_name: Some(LAST_NAMES.choose(&mut rng).unwrap().to_string()),
        }),
        content: Some(format!("{} #{}", content, rng.gen_range(0..10_000))),
    }
}

async fn seed_post_data(posts: &dyn PostRepository) {
    tracing::info!("Seeding post data");
    for _ in 0..SEED_COUNT {
        let CreatePostRequest {
            title,
            author,
            content,
        } = generate_post_data();
        let author = author.unwrap_or_default();
        let fields = NewPost {
            title,
            author: Some(PartialAuthor {
                first_name: author.first_name,
                last_name: author.last_name,
            }),
            content,
            created: None,
        };
        posts.insert(fields).await.expect("Failed to seed a post");
    }
}
