use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use url::Url;
use user_list::ui::{RowPresentable, TableController, TableDataSource};
use user_list::{ApiManager, Comment, Endpoint, ListViewModel, User};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resource {
    Users,
    Comments,
}

impl From<Resource> for Endpoint {
    fn from(resource: Resource) -> Self {
        match resource {
            Resource::Users => Endpoint::UsersFetch,
            Resource::Comments => Endpoint::CommentsFetch,
        }
    }
}

/// Fetches a list from a JSON endpoint and prints it as rows
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Which list to fetch
    #[arg(long, value_enum, default_value_t = Resource::Users)]
    endpoint: Resource,
    /// Send the request to this origin instead of the endpoints own host
    #[arg(long, env = "USER_LIST_ORIGIN")]
    origin: Option<Url>,
}

async fn show<T>(api: ApiManager, endpoint: Endpoint) -> anyhow::Result<()>
where
    T: RowPresentable + DeserializeOwned + Send + 'static,
{
    let mut controller = TableController::new(ListViewModel::<T>::new(api, endpoint));
    controller.view_did_load();
    controller.process_next_update().await;
    if let Some(err) = controller.take_last_error() {
        return Err(err).with_context(|| format!("Could not fetch {}", endpoint.url_str()));
    }
    for index in 0..controller.row_count() {
        let Some(row) = controller.row_at(index) else { break };
        println!("{}\n    {}", row.title, row.subtitle);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut api = ApiManager::new().context("Could not build http client")?;
    if let Some(origin) = args.origin {
        api = api.with_origin(origin);
    }
    let endpoint = Endpoint::from(args.endpoint);
    match args.endpoint {
        Resource::Users => show::<User>(api, endpoint).await,
        Resource::Comments => show::<Comment>(api, endpoint).await,
    }
}
