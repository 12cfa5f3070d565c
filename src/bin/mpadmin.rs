//! Terminal console for the marketplace back office.
#![allow(
    clippy::exit,
    reason = "CLI binary uses process::exit for fatal errors"
)]

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use marketplace_admin::admin::{AdminBlocking, FetchPolicy};
use marketplace_admin::auth::{SIGN_OUT_DELAY, authorize_admin};
use marketplace_admin::cache::{CacheStore, FileCache};
use marketplace_admin::columns::{business_columns, category_columns, user_columns};
use marketplace_admin::config::{Config, TOKEN_ENV};
use marketplace_admin::error::{AdminError, Result as AdminResult};
use marketplace_admin::filters::{
    BusinessStats, CategoryStats, NotificationStats, UserStats, filter_businesses,
    filter_categories, filter_users,
};
use marketplace_admin::format::{date_time, delivery_copy, recipient_copy, relative_time};
use marketplace_admin::models::{
    Business, BusinessDocument, BusinessId, BusinessKind, CategoryForm, CategoryId, CategoryImage,
    CategoryKind, Destination, DocumentId, DocumentReview, NewNotification, Notification,
    NotificationId, ProductKind, StatusAction, UserId,
};
use marketplace_admin::table::{
    Align, Layout, PageItem, Pagination, RenderedTable, SortDirection, Table as ListTable,
    TableView,
};
use marketplace_admin::toast::{Toast, ToastCenter, ToastKind};
use marketplace_admin::view_state::{
    BusinessFilters, CategoryFilters, ListFilters, ListViewState, UserFilters,
};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Width assumed when the terminal size cannot be detected.
const FALLBACK_WIDTH: u16 = 120;

/// Placeholder for missing values.
const NONE: &str = "-";

/// Marketplace admin console: review businesses, manage categories,
/// users, notifications and points.
#[derive(Debug, Parser)]
#[command(name = "mpadmin", version, about)]
struct Cli {
    /// Override the cache directory (default: platform cache dir).
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,
    /// Ignore cached lists and fetch everything from the API.
    #[arg(long, global = true)]
    refresh: bool,
    /// Render for this many terminal columns instead of detecting them.
    #[arg(long, global = true, value_name = "COLUMNS")]
    width: Option<u16>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Summary of businesses, users, categories and notifications.
    Dashboard,
    /// List businesses.
    Businesses(BusinessListArgs),
    /// Show one business with its documents.
    Business {
        /// Business id.
        id: String,
    },
    /// Approve a pending business.
    Approve {
        /// Business id.
        id: String,
    },
    /// Reject a pending business.
    Reject {
        /// Business id.
        id: String,
        /// Reason shown to the owner (required).
        #[arg(long)]
        reason: Option<String>,
    },
    /// Suspend an accepted business.
    Suspend {
        /// Business id.
        id: String,
        /// Reason shown to the owner (required).
        #[arg(long)]
        reason: Option<String>,
    },
    /// Reactivate a suspended business.
    Reactivate {
        /// Business id.
        id: String,
    },
    /// Approve or reject a business document.
    DocumentStatus {
        /// Document id.
        id: String,
        /// Verdict: `approved` or `rejected`.
        status: DocumentReview,
    },
    /// Delete a business.
    DeleteBusiness {
        /// Business id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List business or product categories.
    Categories {
        /// Category family.
        #[arg(value_enum)]
        kind: KindArg,
        /// View options.
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a category.
    CategoryCreate {
        /// Category family.
        #[arg(value_enum)]
        kind: KindArg,
        /// Category name.
        #[arg(long)]
        name: String,
        /// Image file (jpeg, png, gif or webp, at most 5 MiB).
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// Rename a category or replace its image.
    CategoryUpdate {
        /// Category family.
        #[arg(value_enum)]
        kind: KindArg,
        /// Category id.
        id: String,
        /// New category name.
        #[arg(long)]
        name: String,
        /// Replacement image file.
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// Delete a category.
    CategoryDelete {
        /// Category family.
        #[arg(value_enum)]
        kind: KindArg,
        /// Category id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List client users.
    Users {
        /// View options.
        #[command(flatten)]
        list: ListArgs,
    },
    /// List push notifications.
    Notifications,
    /// Send or schedule a push notification.
    NotificationCreate(NotificationArgs),
    /// Delete a push notification.
    NotificationDelete {
        /// Notification id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Show the points configuration.
    Points,
    /// Set how many pesos one point is worth.
    PointsSet {
        /// Pesos per point.
        value: String,
    },
    /// Convert between pesos and points.
    PointsConvert {
        /// Amount to convert.
        amount: f64,
        /// Unit of the amount.
        #[arg(long, value_enum, default_value_t = Unit::Pesos)]
        from: Unit,
    },
    /// Discard every cached query.
    CacheClear,
}

/// Category family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// Business categories.
    Business,
    /// Product categories.
    Product,
}

/// Unit for `points-convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Unit {
    /// Pesos.
    Pesos,
    /// Points.
    Points,
}

/// Options shared by list views.
#[derive(Debug, Default, Args)]
struct ListArgs {
    /// Start from a saved view, e.g. `search=cafe&page=2&sortBy=name`.
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,
    /// Reset search, sort, paging and filters before applying flags.
    #[arg(long)]
    clear: bool,
    /// Search text.
    #[arg(long)]
    search: Option<String>,
    /// Rows per page.
    #[arg(long)]
    page_size: Option<usize>,
    /// Sort by this column; naming the current column flips the direction.
    #[arg(long, value_name = "COLUMN")]
    sort: Option<String>,
    /// One-based page number.
    #[arg(long)]
    page: Option<usize>,
}

/// Arguments for the `businesses` subcommand.
#[derive(Debug, Default, Args)]
struct BusinessListArgs {
    /// View options.
    #[command(flatten)]
    list: ListArgs,
    /// Only businesses in this status (pending, accepted, rejected, suspended).
    #[arg(long)]
    status: Option<String>,
    /// Only open or closed businesses.
    #[arg(long)]
    open: Option<String>,
}

/// Arguments for the `notification-create` subcommand.
#[derive(Debug, Args)]
struct NotificationArgs {
    /// Notification title.
    #[arg(long)]
    title: String,
    /// Notification body.
    #[arg(long)]
    body: String,
    /// Send to a single user instead of everyone.
    #[arg(long, value_name = "USER_ID")]
    user: Option<String>,
    /// Delivery time (RFC 3339); omit to send immediately.
    #[arg(long, value_parser = parse_datetime)]
    at: Option<DateTime<Utc>>,
    /// Extra payload entry; may be repeated.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_data_pair)]
    data: Vec<(String, String)>,
}

/// Parses an RFC 3339 timestamp for clap.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("{err}"))
}

/// Parses a `KEY=VALUE` payload entry for clap.
fn parse_data_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        Some(_) | None => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

/// Prints an error line to stderr.
fn print_error(context: &str, err: &dyn core::fmt::Display) -> io::Result<()> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )
}

/// Reads the session token from the configuration.
fn read_token(config: &Config) -> io::Result<Option<&str>> {
    match config.require_token() {
        Ok(token) => Ok(Some(token)),
        Err(err) => {
            let mut out = io::stderr().lock();
            writeln!(out, "{} {err}", "error:".red().bold())?;
            writeln!(
                out,
                "  {} sign in and set {}=<session token> in .env",
                "hint:".cyan(),
                TOKEN_ENV
            )?;
            Ok(None)
        }
    }
}

/// Admits administrators only. Any other session is shown an access-denied
/// message, then signed out after a short delay and its cache discarded.
fn admit<C: CacheStore>(token: &str, cache: &C) -> io::Result<bool> {
    match authorize_admin(token, Utc::now()) {
        Ok(admin) => {
            tracing::info!(user = %admin.session().user_id, "signed in");
            Ok(true)
        }
        Err(denial) => {
            writeln!(
                io::stderr().lock(),
                "{} {denial}",
                "access denied:".red().bold()
            )?;
            std::thread::sleep(SIGN_OUT_DELAY);
            if let Err(err) = cache.clear() {
                print_error("failed to clear the session cache", &err)?;
            }
            tracing::info!("signed out");
            Ok(false)
        }
    }
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    let _dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            print_error("invalid configuration", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let cache = match create_cache(cli.cache_dir.or_else(|| config.cache_dir().cloned())) {
        Ok(cache) => cache,
        Err(err) => {
            print_error("failed to initialize cache", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if matches!(cli.command, Command::CacheClear) {
        return cmd_cache_clear(&cache);
    }

    let Some(token) = read_token(&config)? else {
        return Ok(ExitCode::FAILURE);
    };
    if !admit(token, &cache)? {
        return Ok(ExitCode::FAILURE);
    }

    let policy = if cli.refresh {
        FetchPolicy::NetworkOnly
    } else {
        FetchPolicy::CacheFirst
    };
    let admin = match AdminBlocking::builder()
        .token(token)
        .base_url(config.api_url())
        .cache(cache)
        .policy(policy)
        .build()
    {
        Ok(admin) => admin,
        Err(err) => {
            print_error("failed to build client", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut toasts = ToastCenter::new();
    let code = dispatch(&admin, &mut toasts, terminal_width(cli.width), cli.command)?;
    print_toasts(&mut toasts)?;
    Ok(code)
}

/// Creates the cache backend, using `dir_override` if provided or the default
/// platform cache directory otherwise.
fn create_cache(dir_override: Option<PathBuf>) -> AdminResult<FileCache> {
    let dir = match dir_override {
        Some(dir) => dir,
        None => FileCache::default_dir()?,
    };
    FileCache::new(dir)
}

/// Terminal width from the flag, the terminal, or [`FALLBACK_WIDTH`].
fn terminal_width(flag: Option<u16>) -> u16 {
    flag.or_else(|| Table::new().width())
        .unwrap_or(FALLBACK_WIDTH)
}

/// Dispatches to the appropriate subcommand handler.
#[allow(
    clippy::too_many_lines,
    reason = "one arm per subcommand reads better than nested dispatchers"
)]
fn dispatch<C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    width: u16,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Dashboard => cmd_dashboard(admin),
        Command::Businesses(args) => cmd_businesses(admin, width, &args),
        Command::Business { id } => cmd_business(admin, &BusinessId::new(id)),
        Command::Approve { id } => cmd_status(admin, toasts, id, StatusAction::Approve, None),
        Command::Reject { id, reason } => {
            cmd_status(admin, toasts, id, StatusAction::Reject, reason.as_deref())
        }
        Command::Suspend { id, reason } => {
            cmd_status(admin, toasts, id, StatusAction::Suspend, reason.as_deref())
        }
        Command::Reactivate { id } => {
            cmd_status(admin, toasts, id, StatusAction::Reactivate, None)
        }
        Command::DocumentStatus { id, status } => {
            let result = with_spinner("Updating document...", || {
                admin.update_document_status(&DocumentId::new(id), status)
            });
            Ok(report(
                toasts,
                result,
                "Document status updated",
                "Could not update the document",
            ))
        }
        Command::DeleteBusiness { id, yes } => {
            if !confirmed(toasts, yes, "business") {
                return Ok(ExitCode::FAILURE);
            }
            let result = with_spinner("Deleting business...", || {
                admin.delete_business(&BusinessId::new(id))
            });
            Ok(report(
                toasts,
                result,
                "Business deleted",
                "Could not delete the business",
            ))
        }
        Command::Categories { kind, list } => match kind {
            KindArg::Business => cmd_categories::<BusinessKind, C>(admin, width, &list),
            KindArg::Product => cmd_categories::<ProductKind, C>(admin, width, &list),
        },
        Command::CategoryCreate { kind, name, image } => match kind {
            KindArg::Business => {
                cmd_category_save::<BusinessKind, C>(admin, toasts, None, name, image.as_deref())
            }
            KindArg::Product => {
                cmd_category_save::<ProductKind, C>(admin, toasts, None, name, image.as_deref())
            }
        },
        Command::CategoryUpdate {
            kind,
            id,
            name,
            image,
        } => match kind {
            KindArg::Business => {
                cmd_category_save::<BusinessKind, C>(admin, toasts, Some(id), name, image.as_deref())
            }
            KindArg::Product => {
                cmd_category_save::<ProductKind, C>(admin, toasts, Some(id), name, image.as_deref())
            }
        },
        Command::CategoryDelete { kind, id, yes } => {
            if !confirmed(toasts, yes, "category") {
                return Ok(ExitCode::FAILURE);
            }
            Ok(match kind {
                KindArg::Business => cmd_category_delete::<BusinessKind, C>(admin, toasts, id),
                KindArg::Product => cmd_category_delete::<ProductKind, C>(admin, toasts, id),
            })
        }
        Command::Users { list } => cmd_users(admin, width, &list),
        Command::Notifications => cmd_notifications(admin, width),
        Command::NotificationCreate(args) => Ok(cmd_notification_create(admin, toasts, args)),
        Command::NotificationDelete { id, yes } => {
            if !confirmed(toasts, yes, "notification") {
                return Ok(ExitCode::FAILURE);
            }
            let result = with_spinner("Deleting notification...", || {
                admin.delete_notification(&NotificationId::new(id))
            });
            Ok(report(
                toasts,
                result,
                "Notification deleted",
                "Could not delete the notification",
            ))
        }
        Command::Points => cmd_points(admin),
        Command::PointsSet { value } => Ok(cmd_points_set(admin, toasts, &value)),
        Command::PointsConvert { amount, from } => cmd_points_convert(admin, amount, from),
        Command::CacheClear => cmd_cache_clear(admin.cache()),
    }
}

// ── Feedback ─────────────────────────────────────────────────────────

/// Records the outcome of a mutation as a toast.
fn report(
    toasts: &mut ToastCenter,
    result: AdminResult<()>,
    success: &str,
    failure: &str,
) -> ExitCode {
    match result {
        Ok(()) => {
            _ = toasts.success(success, None);
            ExitCode::SUCCESS
        }
        Err(AdminError::Validation(errors)) => {
            _ = toasts.error("Please fix the invalid fields", Some(errors.to_string()));
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::debug!(error = %err, "mutation failed");
            _ = toasts.error(failure, Some(err.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Returns `yes`; warns that `what` was kept when it is `false`.
fn confirmed(toasts: &mut ToastCenter, yes: bool, what: &str) -> bool {
    if !yes {
        _ = toasts.warning(
            format!("The {what} was not deleted"),
            Some("Pass --yes to confirm the deletion.".to_owned()),
        );
    }
    yes
}

/// Prints and removes every pending toast.
fn print_toasts(toasts: &mut ToastCenter) -> io::Result<()> {
    let mut err = io::stderr().lock();
    for toast in toasts.drain() {
        write_toast(&mut err, &toast)?;
    }
    Ok(())
}

/// Writes one toast.
fn write_toast<W: io::Write>(out: &mut W, toast: &Toast) -> io::Result<()> {
    let label = format!("{}:", toast.kind.label());
    let styled = match toast.kind {
        ToastKind::Success => label.green().bold().to_string(),
        ToastKind::Error => label.red().bold().to_string(),
        ToastKind::Warning => label.yellow().bold().to_string(),
        ToastKind::Info => label.cyan().bold().to_string(),
    };
    writeln!(out, "{styled} {}", toast.title)?;
    if let Some(message) = toast.message.as_deref() {
        writeln!(out, "  {message}")?;
    }
    Ok(())
}

/// Runs `op` behind a spinner.
fn with_spinner<T, F: FnOnce() -> AdminResult<T>>(message: &str, op: F) -> AdminResult<T> {
    let spinner = make_spinner(message);
    let result = op();
    spinner.finish_and_clear();
    result
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

// ── List views ───────────────────────────────────────────────────────

/// Builds a view state from `--query` and the individual flags.
///
/// Flags apply after the query string, in the order a user would click:
/// reset, search, page size, sort, then page.
fn list_state<F: ListFilters>(args: &ListArgs) -> ListViewState<F> {
    let mut state = args
        .query
        .as_deref()
        .map_or_else(ListViewState::default, ListViewState::from_query);
    if args.clear {
        state.clear_all();
    }
    if let Some(search) = args.search.as_deref() {
        state.set_search(search);
    }
    if let Some(page_size) = args.page_size {
        state.set_page_size(page_size);
    }
    if let Some(column) = args.sort.as_deref() {
        state.toggle_sort(column);
    }
    if let Some(page) = args.page {
        state.set_page(page);
    }
    state
}

/// Builds the business view state; prints an error for a bad filter.
fn business_state(args: &BusinessListArgs) -> io::Result<Option<ListViewState<BusinessFilters>>> {
    let mut state = list_state::<BusinessFilters>(&args.list);
    let page = args.list.page;
    for (key, value) in [("status", args.status.as_deref()), ("open", args.open.as_deref())] {
        if let Some(text) = value
            && !state.set_filter(key, Some(text))
        {
            writeln!(
                io::stderr().lock(),
                "{} invalid --{key} value: {text}",
                "error:".red().bold()
            )?;
            return Ok(None);
        }
    }
    if let Some(number) = page {
        state.set_page(number);
    }
    Ok(Some(state))
}

/// Renders a processed list, or prints the serialization error.
fn render_list<T: Serialize>(
    title: &str,
    table: &ListTable<T>,
    rows: &[T],
    width: u16,
    empty_message: &str,
) -> io::Result<ExitCode> {
    match table.view(rows, width) {
        Ok(view) => {
            print_view(title, &view, empty_message)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_error("failed to render list", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints the query string that reproduces the current view.
fn print_query(query: &str) -> io::Result<()> {
    if query.is_empty() {
        return Ok(());
    }
    writeln!(io::stdout().lock(), "{} --query '{query}'", "view:".dimmed())
}

/// Executes the `businesses` subcommand.
fn cmd_businesses<C: CacheStore>(
    admin: &AdminBlocking<C>,
    width: u16,
    args: &BusinessListArgs,
) -> io::Result<ExitCode> {
    let Some(state) = business_state(args)? else {
        return Ok(ExitCode::FAILURE);
    };
    let businesses = match with_spinner("Loading businesses...", || admin.businesses()) {
        Ok(businesses) => businesses,
        Err(err) => {
            print_error("failed to load businesses", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let filters = state.filters();
    let filtered = filter_businesses(&businesses, state.search(), filters.status, filters.open);
    let table = ListTable::new(business_columns())
        .sort(state.sort_state())
        .tie_break("name")
        .pagination(state.pagination(filtered.len()));
    let code = render_list(
        "Businesses",
        &table,
        &filtered,
        width,
        "No businesses match the current filters.",
    )?;
    print_query(&state.to_query())?;
    Ok(code)
}

/// Executes the `users` subcommand.
fn cmd_users<C: CacheStore>(
    admin: &AdminBlocking<C>,
    width: u16,
    args: &ListArgs,
) -> io::Result<ExitCode> {
    let state = list_state::<UserFilters>(args);
    let users = match with_spinner("Loading users...", || admin.clients()) {
        Ok(users) => users,
        Err(err) => {
            print_error("failed to load users", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let stats = UserStats::from_users(&users);
    writeln!(
        io::stdout().lock(),
        "{}",
        format_args!(
            "{} users, {} with active subscriptions, {:.1} subscriptions per user",
            stats.total,
            stats.with_active_subscriptions,
            stats.average_subscriptions_per_user()
        )
        .dimmed()
    )?;

    let filtered = filter_users(&users, state.search());
    let table = ListTable::new(user_columns())
        .sort(state.sort_state())
        .tie_break("fullName")
        .pagination(state.pagination(filtered.len()));
    let code = render_list("Users", &table, &filtered, width, "No users found.")?;
    print_query(&state.to_query())?;
    Ok(code)
}

/// Executes the `categories` subcommand for kind `K`.
fn cmd_categories<K: CategoryKind, C: CacheStore>(
    admin: &AdminBlocking<C>,
    width: u16,
    args: &ListArgs,
) -> io::Result<ExitCode> {
    let state = list_state::<CategoryFilters>(args);
    let categories = match with_spinner("Loading categories...", || admin.categories::<K>()) {
        Ok(categories) => categories,
        Err(err) => {
            print_error("failed to load categories", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let stats = CategoryStats::from_categories(&categories, Utc::now());
    writeln!(
        io::stdout().lock(),
        "{}",
        format_args!(
            "{} total, {} active, {} added in the last 30 days",
            stats.total, stats.active, stats.recent
        )
        .dimmed()
    )?;

    let filtered = filter_categories(&categories, state.search());
    let table = ListTable::new(category_columns::<K>())
        .sort(state.sort_state())
        .tie_break("name")
        .pagination(state.pagination(filtered.len()));
    let title = format!("{}s", K::LABEL);
    let code = render_list(&title, &table, &filtered, width, "No categories found.")?;
    print_query(&state.to_query())?;
    Ok(code)
}

// ── Business detail and mutations ────────────────────────────────────

/// Executes the `business` subcommand.
fn cmd_business<C: CacheStore>(admin: &AdminBlocking<C>, id: &BusinessId) -> io::Result<ExitCode> {
    let business = match with_spinner("Loading business...", || admin.business(id)) {
        Ok(business) => business,
        Err(err) => {
            print_error("failed to load business", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    print_business(&business, Utc::now())?;

    match with_spinner("Loading documents...", || admin.documents_of(id)) {
        Ok(documents) => print_documents(&documents)?,
        Err(err) => {
            print_error("failed to load documents", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints a business as a two-column card.
fn print_business(business: &Business, now: DateTime<Utc>) -> io::Result<()> {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    let rating = business
        .rating
        .map_or_else(|| "No rating".to_owned(), |rating| format!("{rating:.1}"));
    let actions: Vec<&str> = business
        .status
        .actions()
        .iter()
        .map(|action| action_command(*action))
        .collect();
    let rows = [
        ("ID", business.id.to_string()),
        ("Status", business.status.label().to_owned()),
        ("Description", business.description.clone()),
        ("Address", business.address.clone().unwrap_or_else(|| NONE.to_owned())),
        ("Phone", business.phone.clone().unwrap_or_else(|| NONE.to_owned())),
        ("Owner", business.user_id.to_string()),
        ("Open", if business.open { "Open" } else { "Closed" }.to_owned()),
        ("Rating", rating),
        (
            "Created",
            format!(
                "{} ({})",
                date_time(business.created_at),
                relative_time(business.created_at, now)
            ),
        ),
        (
            "Actions",
            if actions.is_empty() {
                NONE.to_owned()
            } else {
                actions.join(", ")
            },
        ),
    ];
    for (field, value) in rows {
        _ = table.add_row(vec![Cell::new(field).fg(Color::Cyan), Cell::new(value)]);
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", business.name.green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Subcommand that applies `action`.
const fn action_command(action: StatusAction) -> &'static str {
    match action {
        StatusAction::Approve => "approve",
        StatusAction::Reject => "reject",
        StatusAction::Suspend => "suspend",
        StatusAction::Reactivate => "reactivate",
    }
}

/// Prints a business's documents.
fn print_documents(documents: &[BusinessDocument]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if documents.is_empty() {
        writeln!(out, "{}", "No documents uploaded.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Document").fg(Color::Cyan),
        Cell::new("URL").fg(Color::Cyan),
        Cell::new("Uploaded").fg(Color::Cyan),
    ]);
    for document in documents {
        _ = table.add_row(vec![
            Cell::new(&document.id),
            Cell::new(document.name.label()),
            Cell::new(&document.url),
            Cell::new(date_time(document.created_at)),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Documents".green().bold(),
        format_args!("({})", documents.len()).dimmed()
    )?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Executes a status-change subcommand.
fn cmd_status<C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    id: String,
    action: StatusAction,
    reason: Option<&str>,
) -> io::Result<ExitCode> {
    let business = match with_spinner("Loading business...", || {
        admin.business(&BusinessId::new(id))
    }) {
        Ok(business) => business,
        Err(err) => {
            print_error("failed to load business", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let result = with_spinner("Updating status...", || {
        admin.update_business_status(&business, action, reason)
    });
    Ok(report(
        toasts,
        result,
        &format!("{} {}", business.name, action.verb()),
        "Could not update the business status",
    ))
}

// ── Categories ───────────────────────────────────────────────────────

/// Reads an image file for upload.
fn load_image(path: &Path) -> io::Result<CategoryImage> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(CategoryImage::mime_for_extension)
        .unwrap_or("application/octet-stream")
        .to_owned();
    Ok(CategoryImage {
        file_name,
        mime_type,
        bytes,
    })
}

/// Creates (`id` is `None`) or updates a category of kind `K`.
fn cmd_category_save<K: CategoryKind, C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    id: Option<String>,
    name: String,
    image_path: Option<&Path>,
) -> io::Result<ExitCode> {
    let image = match image_path.map(load_image).transpose() {
        Ok(image) => image,
        Err(err) => {
            print_error("failed to read image", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let form = CategoryForm { name, image };

    let (result, outcome, failure) = id.map_or_else(
        || {
            let result = with_spinner("Saving category...", || admin.create_category::<K>(&form));
            (result, "created", "Could not create the category")
        },
        |raw| {
            let category_id = CategoryId::<K>::new(raw);
            let result = with_spinner("Saving category...", || {
                admin.update_category::<K>(&category_id, &form)
            });
            (result, "updated", "Could not update the category")
        },
    );
    Ok(report(
        toasts,
        result,
        &format!("{} {outcome}", K::LABEL),
        failure,
    ))
}

/// Deletes a category of kind `K`.
fn cmd_category_delete<K: CategoryKind, C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    id: String,
) -> ExitCode {
    let category_id = CategoryId::<K>::new(id);
    let result = with_spinner("Deleting category...", || {
        admin.delete_category::<K>(&category_id)
    });
    report(
        toasts,
        result,
        &format!("{} deleted", K::LABEL),
        "Could not delete the category",
    )
}

// ── Notifications ────────────────────────────────────────────────────

/// Executes the `notifications` subcommand.
fn cmd_notifications<C: CacheStore>(admin: &AdminBlocking<C>, width: u16) -> io::Result<ExitCode> {
    let notifications = match with_spinner("Loading notifications...", || admin.notifications()) {
        Ok(notifications) => notifications,
        Err(err) => {
            print_error("failed to load notifications", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let stats = match admin.notification_stats() {
        Ok(stats) => stats,
        Err(err) => {
            print_error("failed to compute notification stats", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    print_notification_stats(&stats)?;
    print_notifications(&notifications, Layout::for_width(width), Utc::now())?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the notification counters on one line.
fn print_notification_stats(stats: &NotificationStats) -> io::Result<()> {
    writeln!(
        io::stdout().lock(),
        "{}",
        format_args!(
            "{} total, {} sent, {} scheduled, {} draft, {} failed",
            stats.total, stats.sent, stats.scheduled, stats.draft, stats.failed
        )
        .dimmed()
    )
}

/// Prints notifications; narrow layouts drop the id and creation columns.
fn print_notifications(
    notifications: &[Notification],
    layout: Layout,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if notifications.is_empty() {
        writeln!(out, "{}", "No notifications found.".dimmed())?;
        return Ok(());
    }

    let wide = layout != Layout::Cards;
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    let mut header = Vec::with_capacity(6);
    if wide {
        header.push(Cell::new("ID").fg(Color::Cyan));
    }
    header.extend([
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Recipient").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Delivery").fg(Color::Cyan),
    ]);
    if wide {
        header.push(Cell::new("Created").fg(Color::Cyan));
    }
    _ = table.set_header(header);

    for notification in notifications {
        let mut row = Vec::with_capacity(6);
        if wide {
            row.push(Cell::new(&notification.id));
        }
        row.extend([
            Cell::new(&notification.title),
            Cell::new(recipient_copy(notification)),
            Cell::new(notification.status.label()),
            Cell::new(delivery_copy(notification.delivery_date, now)),
        ]);
        if wide {
            row.push(Cell::new(relative_time(notification.created_at, now)));
        }
        _ = table.add_row(row);
    }

    writeln!(
        out,
        "{} {}",
        "Notifications".green().bold(),
        format_args!("({})", notifications.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Builds the create request from CLI arguments.
fn new_notification(args: NotificationArgs) -> NewNotification {
    let destination = match args.user {
        Some(user) if !user.trim().is_empty() => Destination::User(UserId::new(user)),
        Some(_) | None => Destination::All,
    };
    NewNotification {
        title: args.title,
        body: args.body,
        destination,
        delivery_date: args.at,
        data: args
            .data
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect(),
    }
}

/// Executes the `notification-create` subcommand.
fn cmd_notification_create<C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    args: NotificationArgs,
) -> ExitCode {
    let notification = new_notification(args);
    let result = with_spinner("Sending notification...", || {
        admin.create_notification(&notification)
    });
    let success = notification.delivery_date.map_or_else(
        || "Notification sent".to_owned(),
        |when| format!("Notification scheduled for {}", date_time(when)),
    );
    report(toasts, result, &success, "Could not create the notification")
}

// ── Points ───────────────────────────────────────────────────────────

/// Executes the `points` subcommand.
fn cmd_points<C: CacheStore>(admin: &AdminBlocking<C>) -> io::Result<ExitCode> {
    let config = match with_spinner("Loading points configuration...", || admin.points_config()) {
        Ok(config) => config,
        Err(err) => {
            print_error("failed to load points configuration", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Points".green().bold())?;
    match config.pesos_per_point() {
        Some(rate) => writeln!(out, "  1 point = {rate} pesos")?,
        None => writeln!(
            out,
            "  {} stored value `{}` is not a positive number",
            "warning:".yellow().bold(),
            config.value
        )?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `points-set` subcommand.
fn cmd_points_set<C: CacheStore>(
    admin: &AdminBlocking<C>,
    toasts: &mut ToastCenter,
    value: &str,
) -> ExitCode {
    let result = with_spinner("Saving points configuration...", || {
        admin.update_points_config(value)
    });
    let message = value.trim().to_owned();
    report(
        toasts,
        result.map(|_| ()),
        &format!("1 point is now worth {message} pesos"),
        "Could not update the points configuration",
    )
}

/// Executes the `points-convert` subcommand.
fn cmd_points_convert<C: CacheStore>(
    admin: &AdminBlocking<C>,
    amount: f64,
    from: Unit,
) -> io::Result<ExitCode> {
    let config = match with_spinner("Loading points configuration...", || admin.points_config()) {
        Ok(config) => config,
        Err(err) => {
            print_error("failed to load points configuration", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let converted = match from {
        Unit::Pesos => config
            .pesos_to_points(amount)
            .map(|points| format!("{amount} pesos = {points} points")),
        Unit::Points => config
            .points_to_pesos(amount)
            .map(|pesos| format!("{amount} points = {pesos:.2} pesos")),
    };
    let Some(line) = converted else {
        writeln!(
            io::stderr().lock(),
            "{} the points value is not configured",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    };
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(ExitCode::SUCCESS)
}

// ── Dashboard and cache ──────────────────────────────────────────────

/// Executes the `dashboard` subcommand.
///
/// Each section is loaded independently; a failed section is reported and
/// the rest are still shown.
fn cmd_dashboard<C: CacheStore>(admin: &AdminBlocking<C>) -> io::Result<ExitCode> {
    let now = Utc::now();
    let spinner = make_spinner("Loading dashboard...");
    let businesses = admin.businesses().map(|list| BusinessStats::from_businesses(&list));
    let users = admin.clients().map(|list| UserStats::from_users(&list));
    let business_categories = admin
        .categories::<BusinessKind>()
        .map(|list| CategoryStats::from_categories(&list, now));
    let product_categories = admin
        .categories::<ProductKind>()
        .map(|list| CategoryStats::from_categories(&list, now));
    let notifications = admin.notification_stats();
    spinner.finish_and_clear();

    let mut rows: Vec<(&str, String)> = Vec::new();
    let mut failed = false;
    match businesses {
        Ok(stats) => rows.extend([
            ("Businesses", stats.total.to_string()),
            ("  pending review", stats.pending.to_string()),
            ("  accepted", stats.accepted.to_string()),
            ("  rejected", stats.rejected.to_string()),
            ("  suspended", stats.suspended.to_string()),
            ("  open now", stats.open.to_string()),
        ]),
        Err(err) => {
            failed = true;
            print_error("failed to load businesses", &err)?;
        }
    }
    match users {
        Ok(stats) => rows.extend([
            ("Users", stats.total.to_string()),
            ("  with active subscriptions", stats.with_active_subscriptions.to_string()),
            ("  with credits", stats.with_credits.to_string()),
        ]),
        Err(err) => {
            failed = true;
            print_error("failed to load users", &err)?;
        }
    }
    for (label, result) in [
        ("Business categories", business_categories),
        ("Product categories", product_categories),
    ] {
        match result {
            Ok(stats) => rows.push((
                label,
                format!("{} ({} active, {} recent)", stats.total, stats.active, stats.recent),
            )),
            Err(err) => {
                failed = true;
                print_error("failed to load categories", &err)?;
            }
        }
    }
    match notifications {
        Ok(stats) => rows.push((
            "Notifications",
            format!(
                "{} ({} sent, {} scheduled)",
                stats.total, stats.sent, stats.scheduled
            ),
        )),
        Err(err) => {
            failed = true;
            print_error("failed to load notifications", &err)?;
        }
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for (metric, value) in rows {
        _ = table.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", "Dashboard".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Executes the `cache-clear` subcommand.
fn cmd_cache_clear<C: CacheStore>(cache: &C) -> io::Result<ExitCode> {
    match cache.clear() {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Cache cleared.".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_error("failed to clear cache", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints a processed list view.
fn print_view(title: &str, view: &TableView, empty_message: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match *view {
        TableView::Loading => writeln!(out, "{}", "Loading...".dimmed())?,
        TableView::Empty { ref pagination } => {
            writeln!(out, "{}", empty_message.dimmed())?;
            if let Some(pager) = pagination.as_ref() {
                write_pager(&mut out, pager)?;
            }
        }
        TableView::Rows(ref rendered) => {
            let total = rendered
                .pagination
                .as_ref()
                .map_or(rendered.rows.len(), Pagination::total);
            writeln!(
                out,
                "{} {}",
                title.green().bold(),
                format_args!("({total})").dimmed()
            )?;
            writeln!(out)?;
            match rendered.layout {
                Layout::Cards => write_cards(&mut out, rendered)?,
                Layout::Medium | Layout::Wide => writeln!(out, "{}", grid_table(rendered))?,
            }
            if let Some(pager) = rendered.pagination.as_ref() {
                write_pager(&mut out, pager)?;
            }
        }
    }
    Ok(())
}

/// Header text with a sort indicator.
fn header_text(title: &str, sorted: Option<SortDirection>) -> String {
    match sorted {
        Some(SortDirection::Ascending) => format!("{title} \u{25b2}"),
        Some(SortDirection::Descending) => format!("{title} \u{25bc}"),
        None => title.to_owned(),
    }
}

/// Maps a column alignment to comfy-table's.
const fn cell_alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

/// Builds the grid used by the medium and wide layouts.
fn grid_table(rendered: &RenderedTable) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        rendered
            .headers
            .iter()
            .map(|header| Cell::new(header_text(header.title, header.sorted)).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    for row in &rendered.rows {
        _ = table.add_row(
            row.iter()
                .zip(&rendered.headers)
                .map(|(text, header)| Cell::new(text).set_alignment(cell_alignment(header.align)))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Writes one two-column card per row.
fn write_cards<W: io::Write>(out: &mut W, rendered: &RenderedTable) -> io::Result<()> {
    for row in &rendered.rows {
        let mut card = Table::new();
        _ = card.load_preset(UTF8_FULL);
        for (header, text) in rendered.headers.iter().zip(row) {
            _ = card.add_row(vec![
                Cell::new(header_text(header.title, header.sorted)).fg(Color::Cyan),
                Cell::new(text),
            ]);
        }
        writeln!(out, "{card}")?;
    }
    Ok(())
}

/// Formats the pager line, e.g. `Showing 11-20 of 95  1 [2] 3 4 5 ... 10`.
fn pager_line(pager: &Pagination) -> String {
    let pages: Vec<String> = pager
        .visible_pages()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == pager.current_page() => format!("[{page}]"),
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "...".to_owned(),
        })
        .collect();
    format!(
        "Showing {}-{} of {}  {}",
        pager.showing_from(),
        pager.showing_to(),
        pager.total(),
        pages.join(" ")
    )
}

/// Writes the pager line.
fn write_pager<W: io::Write>(out: &mut W, pager: &Pagination) -> io::Result<()> {
    writeln!(out, "{}", pager_line(pager).dimmed())
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed there is
            // nowhere left to report it.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
