//! Lead board walkthrough against the in-memory backend
//!
//! This example demonstrates:
//! - Fetching a typed collection through an envelope
//! - Search, filter, sort and pagination on the client
//! - Create and confirmed delete with notifications and re-fetch
//! - Closing the screen cancels further fetches

use anyhow::Result;
use bizlist::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    bizlist::logging::init_tracing("bizlist=info,lead_board=info");

    println!("📋 bizlist lead board");
    println!("=====================\n");

    // Start a backend with some leads
    let backend = InMemoryBackend::new()
        .with_envelope("leads", "leads")
        .with_required_fields("leads", &["name"])
        .require_token("demo-token");
    let statuses = ["new", "contacted", "qualified", "lost"];
    backend.seed(
        "leads",
        (1..=23)
            .map(|i| {
                json!({
                    "id": i.to_string(),
                    "name": format!("Company {i:02}"),
                    "company": if i % 5 == 0 { "Acme Group" } else { "Independent" },
                    "status": statuses[i % statuses.len()],
                    "createdAt": format!("2024-02-{:02}", i),
                })
            })
            .collect(),
    );
    let addr = backend.spawn().await?;
    println!("✅ Backend listening on http://{addr}\n");

    // Wire the client
    let config = ClientConfig::new(format!("http://{addr}")).with_env_overrides();
    let metrics = ClientMetrics::init();
    let session = Arc::new(InMemorySessionStore::with_token("demo-token"));
    let client = Arc::new(RestClient::new(&config.api, session, metrics.clone())?);

    let lead_config = config.resource("lead");
    let query = QueryState::new(lead_config.page_size())
        .with_sort(Some(SortSpec::desc("created_at")));
    let list: SharedList<Lead> = Arc::new(RwLock::new(ListController::with_query(query)));
    let bus = NotificationBus::default();
    let mut toasts = bus.subscribe();

    let leads = Arc::new(RestResource::<Lead>::from_config(client, lead_config));
    let loader = Arc::new(ListLoader::new(leads, list.clone(), bus));
    let dispatcher = MutationDispatcher::new(loader.clone());

    // Initial fetch
    loader.refresh().await?;
    print_page(&list, "All leads, newest first").await;

    // Search + filter
    {
        let mut controller = list.write().await;
        controller.set_search_term("acme");
        controller.set_filter("status", "contacted");
    }
    print_page(&list, "Search 'acme', status = contacted").await;

    {
        let mut controller = list.write().await;
        controller.reset_query();
        controller.next_page();
    }
    print_page(&list, "Page 2").await;

    // Create
    dispatcher
        .create(&LeadDraft::new("Zenith Labs").company("Zenith").status("qualified"))
        .await?;
    if let Ok(toast) = toasts.try_recv() {
        println!("🔔 {}", toast.message);
    }

    // Invalid create never leaves the client
    if let Err(e) = dispatcher.create(&LeadDraft::new("")).await {
        println!("⚠️  {}", e.user_message());
    }
    let _ = toasts.try_recv();

    // Delete, confirming
    let victim = list.read().await.items()[0].id.clone();
    let outcome = dispatcher
        .remove(&victim, &|prompt: &str| {
            println!("❓ {prompt} yes");
            true
        })
        .await?;
    println!("🗑️  {outcome:?}");
    if let Ok(toast) = toasts.try_recv() {
        println!("🔔 {}", toast.message);
    }

    // Leaving the screen
    loader.cancel();
    if let Err(e) = loader.refresh().await {
        println!("🚪 After close: {e}");
    }

    let snapshot = metrics.snapshot();
    println!(
        "\n📈 {} requests ({} ok, {} failed), avg {:?}",
        snapshot.requests,
        snapshot.successes,
        snapshot.failures,
        snapshot.average_latency().unwrap_or_default()
    );

    Ok(())
}

async fn print_page(list: &SharedList<Lead>, title: &str) {
    let controller = list.read().await;
    let view = controller.view();
    println!(
        "── {title} (page {}/{}, {} matching)",
        view.pagination.page, view.pagination.total_pages, view.pagination.total
    );
    for lead in &view.items {
        println!(
            "   {:<12} {:<12} {:<10}",
            lead.name,
            lead.company.as_deref().unwrap_or("-"),
            lead.status
        );
    }
    println!();
}
