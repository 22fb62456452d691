use crate::di::FilteringServices;
use anyhow::Context;
use listwarden_domain::{Filter, FilterKind, FilterProperties, RefreshFlags};
use listwarden_jobs::{FilterRefreshJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Activate the configured filters and keep them fresh until Ctrl+C.
pub async fn serve(
    services: FilteringServices,
    shutdown: CancellationToken,
    first_run: bool,
) -> anyhow::Result<()> {
    if first_run {
        services.persist().await;
    }

    services.activator.activate(false).await?;
    let active = services.engine.active();
    info!(
        blocklists = active.blocklists.len(),
        allowlists = active.allowlists.len(),
        rules = active.total_rules(),
        "Initial filter set active"
    );

    let handles = JobRunner::new()
        .with_filter_refresh(
            FilterRefreshJob::new(services.refresh.clone(), services.settings.clone())
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    info!("Listwarden ready, press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("Shutdown requested, waiting for running downloads");
    shutdown.cancel();
    for handle in handles {
        let _ = handle.await;
    }
    info!("Stopped");
    Ok(())
}

pub async fn refresh(services: &FilteringServices, flags: RefreshFlags) -> anyhow::Result<()> {
    let updated = services.refresh.execute(flags, true).await?;
    println!("{} filter(s) updated", updated);
    Ok(())
}

pub async fn list(services: &FilteringServices) {
    let overview = services.use_cases.get_filters.execute().await;

    println!(
        "filtering: {}, refresh every {}h",
        if overview.enabled { "on" } else { "off" },
        overview.update_interval_hours
    );
    print_section("block-lists", &overview.blocklists);
    print_section("allow-lists", &overview.allowlists);
    println!("user rules: {}", overview.user_rules.len());
}

fn print_section(title: &str, filters: &[Filter]) {
    println!("{}:", title);
    for f in filters {
        let updated = f
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  [{}] {:>12} {:>8} rules  {:<16}  {}  {}",
            if f.enabled { "x" } else { " " },
            f.id,
            f.rule_count,
            updated,
            f.name,
            f.url
        );
    }
}

pub async fn add(
    services: &FilteringServices,
    url: String,
    name: String,
    kind: FilterKind,
) -> anyhow::Result<()> {
    let filter = services.use_cases.add_filter.execute(url, name, kind).await?;
    println!(
        "added {} ({} rules, id {})",
        filter.url, filter.rule_count, filter.id
    );
    Ok(())
}

pub async fn remove(services: &FilteringServices, url: &str, kind: FilterKind) -> anyhow::Result<()> {
    let filter = services.use_cases.remove_filter.execute(url, kind).await?;
    println!("removed {} (id {})", filter.url, filter.id);
    Ok(())
}

/// Change a filter's enablement, name or URL; unspecified properties keep
/// their current value.
pub async fn edit(
    services: &FilteringServices,
    url: &str,
    kind: FilterKind,
    enabled: Option<bool>,
    name: Option<String>,
    new_url: Option<String>,
) -> anyhow::Result<()> {
    let current = services
        .store
        .get(url, kind)
        .await
        .with_context(|| format!("no {} with URL {}", kind.as_str(), url))?;

    let props = FilterProperties {
        url: new_url.map(Into::into).unwrap_or_else(|| current.url.clone()),
        name: name.map(Into::into).unwrap_or_else(|| current.name.clone()),
        enabled: enabled.unwrap_or(current.enabled),
    };

    let change = services.use_cases.update_filter.execute(url, props, kind).await?;
    println!(
        "updated {} (enabled changed: {}, url changed: {})",
        url, change.enabled_changed, change.url_changed
    );
    Ok(())
}

pub async fn set_rules(services: &FilteringServices, rules: Vec<String>) -> anyhow::Result<()> {
    let count = rules.len();
    services.use_cases.set_user_rules.execute(rules).await?;
    println!("{} user rule(s) saved", count);
    Ok(())
}

pub async fn settings(
    services: &FilteringServices,
    enabled: Option<bool>,
    interval: Option<u32>,
) -> anyhow::Result<()> {
    let current = services
        .use_cases
        .update_settings
        .execute(enabled, interval)
        .await?;
    println!(
        "filtering: {}, refresh every {}h",
        if current.enabled { "on" } else { "off" },
        current.update_interval_hours
    );
    Ok(())
}
