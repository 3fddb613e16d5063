//! Subcommand implementations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use paan_core::access::AccessEvaluator;
use paan_core::api::SupabaseClient;
use paan_core::auth::Session;
use paan_core::models::{
    AccessHub, CanonicalTier, ContentItem, Event, ItemId, MarketIntel, Offer, Opportunity, Registration,
    Resource, Update, User,
};
use paan_core::{compute_stats, filter_and_sort, normalize_tier, registered_ids, search, Section, SortKey, StatsFilter};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::render;

/// Where section rows and the member come from, shared by `stats` and `list`.
#[derive(Debug, Clone, Default)]
pub struct Source {
    /// Read rows from a JSON file instead of Supabase
    pub input: Option<PathBuf>,
    /// Read registrations from a JSON file instead of Supabase
    pub registrations: Option<PathBuf>,
    /// View as this tier instead of the signed-in member's
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: Option<StatsFilter>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub json: bool,
}

pub enum View {
    Stats { json: bool },
    List(ListOptions),
}

/// Loaded configuration and session, plus a client when the project is configured.
pub struct Portal {
    pub config: Config,
    pub session: Session,
    client: Option<SupabaseClient>,
}

impl Portal {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let mut session = Session::new(config.cache_dir()?);
        if let Err(e) = session.load() {
            warn!(error = %e, "Ignoring unreadable session file");
        }

        let client = match config.supabase() {
            Some((url, key)) => {
                let client = SupabaseClient::new(url, key)?;
                Some(match session.token() {
                    Some(token) => client.with_token(token.to_string()),
                    None => client,
                })
            }
            None => None,
        };

        Ok(Self { config, session, client })
    }

    fn client(&self) -> Result<&SupabaseClient> {
        self.client.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Supabase is not configured: set SUPABASE_URL and SUPABASE_ANON_KEY, or pass --input")
        })
    }
}

// ============================================================================
// access / tiers
// ============================================================================

pub fn access(content_tier: &str, user_tier: Option<&str>) {
    let access = AccessEvaluator::for_tier(user_tier);
    let decision = access.decide(Some(content_tier));
    if decision.accessible {
        println!("granted: {} can access {} content", decision.user_tier, decision.required);
    } else {
        println!(
            "denied: {} content is not available to {}",
            decision.required, decision.user_tier
        );
    }
}

pub fn tiers(labels: &[String]) {
    if labels.is_empty() {
        for tier in CanonicalTier::MEMBER_TIERS {
            let next = tier
                .next()
                .map(|t| format!(" -> {}", t))
                .unwrap_or_default();
            println!("{} {}{}", tier.order().unwrap_or(0), tier, next);
        }
        println!("- {} (no restriction)", CanonicalTier::All);
        return;
    }
    for label in labels {
        println!("{:?} => {}", label, normalize_tier(Some(label)));
    }
}

// ============================================================================
// login / logout
// ============================================================================

pub async fn login(portal: &mut Portal, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| portal.config.last_email.clone()) {
        Some(email) => email,
        None => anyhow::bail!("No email given; pass --email"),
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let data = portal.client()?.authenticate(&email, &password).await?;
    info!(user_id = %data.user_id, "Signed in");
    println!("Signed in as {} (session valid for {} minutes)", data.email, data.minutes_until_expiry());

    portal.session.update(data);
    portal.session.save()?;
    portal.config.last_email = Some(email);
    portal.config.save()?;
    Ok(())
}

pub fn logout(portal: &mut Portal) -> Result<()> {
    portal.session.clear()?;
    println!("Signed out");
    Ok(())
}

// ============================================================================
// stats / list
// ============================================================================

pub async fn section(portal: &Portal, section: Section, source: &Source, view: View) -> Result<()> {
    match section {
        Section::Events => show::<Event>(portal, section, source, view).await,
        Section::Offers => show::<Offer>(portal, section, source, view).await,
        Section::Resources => show::<Resource>(portal, section, source, view).await,
        Section::MarketIntel => show::<MarketIntel>(portal, section, source, view).await,
        Section::Opportunities => show::<Opportunity>(portal, section, source, view).await,
        Section::Updates => show::<Update>(portal, section, source, view).await,
        Section::AccessHubs => show::<AccessHub>(portal, section, source, view).await,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn load_items<T: DeserializeOwned>(portal: &Portal, section: Section, source: &Source) -> Result<Vec<T>> {
    match &source.input {
        Some(path) => read_json(path),
        None => portal.client()?.fetch_section(section).await,
    }
}

/// `--tier` wins, then the signed-in member's profile, then the configured default.
async fn load_user(portal: &Portal, source: &Source) -> Result<Option<User>> {
    match (&source.tier, portal.session.user_id()) {
        (Some(tier), _) => Ok(Some(User::with_tier(tier))),
        (None, Some(id)) if source.input.is_none() => portal.client()?.fetch_profile(id).await,
        _ => Ok(portal.config.default_tier.as_deref().map(User::with_tier)),
    }
}

async fn load_registrations(
    portal: &Portal,
    section: Section,
    source: &Source,
) -> Result<Option<Vec<Registration>>> {
    if !section.supports_registration() {
        return Ok(None);
    }
    match (&source.registrations, portal.session.user_id()) {
        (Some(path), _) => read_json(path).map(Some),
        (None, Some(id)) if source.input.is_none() => {
            portal.client()?.fetch_registrations(id).await.map(Some)
        }
        _ => Ok(None),
    }
}

/// Rows, member profile and registrations, fetched concurrently where remote.
async fn load<T: DeserializeOwned>(
    portal: &Portal,
    section: Section,
    source: &Source,
) -> Result<(Vec<T>, Option<User>, Option<HashSet<ItemId>>)> {
    let (items, user, registrations) = futures::try_join!(
        load_items::<T>(portal, section, source),
        load_user(portal, source),
        load_registrations(portal, section, source),
    )?;
    debug!(
        section = %section,
        count = items.len(),
        registrations = registrations.as_ref().map(|r| r.len()),
        "Loaded section"
    );
    Ok((items, user, registrations.map(|r| registered_ids(&r))))
}

async fn show<T>(portal: &Portal, section: Section, source: &Source, view: View) -> Result<()>
where
    T: ContentItem + DeserializeOwned + Serialize,
{
    let (items, user, registered) = load::<T>(portal, section, source).await?;
    let access = AccessEvaluator::for_user(user.as_ref());

    match view {
        View::Stats { json } => {
            let buckets = compute_stats(
                &items,
                user.as_ref(),
                section.categories(),
                section.title(),
                registered.as_ref(),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&buckets)?);
            } else {
                let member = user.as_ref().map(User::display_name);
                render::print_stats(section, access.user_tier(), member, &buckets);
            }
        }
        View::List(opts) => {
            let filter = match (opts.filter, &opts.category) {
                (Some(filter), _) => filter,
                (None, Some(_)) => StatsFilter::Categories,
                (None, None) => StatsFilter::Total,
            };
            if filter == StatsFilter::Registered && registered.is_none() {
                warn!(section = %section, "No registrations available; the registered filter will be empty");
            }
            let sorted = filter_and_sort(
                &items,
                filter,
                opts.category.as_deref(),
                user.as_ref(),
                registered.as_ref(),
                opts.sort.unwrap_or_else(|| section.sort_key()),
            );
            let shown = search(sorted, opts.search.as_deref().unwrap_or(""));

            if opts.json {
                let listed = render::listed_items(&shown, &access);
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                render::print_list(section, &shown, &access);
            }
        }
    }
    Ok(())
}
