use anyhow::{Context, Result};
use futures::StreamExt;
use sea_orm::ConnectOptions;
use site_content::api::{self, AppState};
use site_content::auth::AdminAuth;
use site_content::config::Config;
use site_content::pages::Templates;
use site_content::search::TantivyIndex;
use site_content::storage::database::DatabaseStorage;
use site_content::{ContentEngine, ContentEvent};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.database_max_connections)
        .sqlx_logging(false);
    let storage = DatabaseStorage::connect(options)
        .await
        .context("failed to connect to the database")?;

    let index = TantivyIndex::with_path(config.search_index_path.clone())
        .context("failed to open the search index")?;

    let engine = ContentEngine::new(storage, index);
    let indexed = engine.reindex().await?;
    tracing::info!(indexed, "search index ready");

    // Log every content change.
    let mut notification_stream = engine.subscribe();
    tokio::spawn(async move {
        while let Some(item) = notification_stream.next().await {
            match item {
                Ok(ContentEvent::BlogCreated(blog)) => {
                    tracing::info!(slug = %blog.slug, title = %blog.title, "event: blog created")
                }
                Ok(ContentEvent::BlogUpdated(blog)) => {
                    tracing::info!(slug = %blog.slug, "event: blog updated")
                }
                Ok(ContentEvent::BlogDeleted(slug)) => tracing::info!(%slug, "event: blog deleted"),
                Ok(ContentEvent::FaqCreated(faq)) => tracing::info!(id = %faq.id, "event: faq created"),
                Ok(ContentEvent::FaqUpdated(faq)) => tracing::info!(id = %faq.id, "event: faq updated"),
                Ok(ContentEvent::FaqDeleted(id)) => tracing::info!(%id, "event: faq deleted"),
                Ok(ContentEvent::SeoPageCreated(page)) => {
                    tracing::info!(slug = %page.slug, "event: seo page created")
                }
                Ok(ContentEvent::SeoPageUpdated(page)) => {
                    tracing::info!(slug = %page.slug, "event: seo page updated")
                }
                Ok(ContentEvent::SeoPageDeleted(slug)) => {
                    tracing::info!(%slug, "event: seo page deleted")
                }
                Err(lagged) => tracing::warn!("event log lagging: {lagged}"),
            }
        }
    });

    let state = AppState::new(
        engine,
        config.site.clone(),
        AdminAuth::new(&config.admin),
        Templates::new()?,
    );
    let app = api::router(state);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    tracing::info!(address = %config.bind_address, site = %config.site.base_url, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
