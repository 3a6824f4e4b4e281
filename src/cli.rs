// src/cli.rs
use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::capabilities::{self, INLINE_SKILL_LIMIT};
use crate::core::{ApiClient, AuthSession, CandidateRegistration, CompanyRegistration, MultipartBody};
use crate::environment::ClientConfig;
use crate::services::{
    CandidateFilter, CompanyFilter, ShortlistFilter, TalentQuery, DEFAULT_PAGE_SIZE,
    REJECTION_REASONS,
};
use crate::types::{
    AdminCandidate, AdminCompany, AdminRecommendation, AdminShortlist, ApiResponse, Availability,
    CandidateProfileUpdate, HiringLocation, NewShortlist, RemotePreference, SeniorityLevel,
    ShortlistStatus, SubmitRecommendation, SubscriptionTier,
};
use crate::utils::{self, mask_token, non_empty, split_list};

#[derive(Parser)]
#[command(name = "bixo")]
#[command(about = "Command-line client for the Bixo recruitment marketplace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session cookies are kept
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(path) = &self.session_file {
            config = config.with_session_path(path.clone());
        }
        if let Some(seconds) = self.timeout {
            config = config.with_timeout(seconds);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "BIXO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    #[command(subcommand)]
    Register(RegisterCommand),
    /// Sign out and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Inspect the stored session
    #[command(subcommand)]
    Session(SessionCommand),
    /// Candidate profile, notifications and recommendations
    #[command(subcommand)]
    Candidate(CandidateCommand),
    /// Talent search and outreach for companies
    #[command(subcommand)]
    Talent(TalentCommand),
    /// Shortlist requests for companies
    #[command(subcommand)]
    Shortlists(ShortlistCommand),
    /// Public recommendation form
    #[command(subcommand)]
    Recommendation(RecommendationCommand),
    /// Admin review
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Upload a file as multipart form data
    Upload {
        /// Endpoint path, e.g. /candidates/cv
        endpoint: String,
        file: PathBuf,
        #[arg(long, default_value = "file")]
        field: String,
    },
    /// Offline skill helpers
    #[command(subcommand)]
    Skills(SkillsCommand),
}

#[derive(Subcommand)]
pub enum RegisterCommand {
    /// Register as a candidate
    Candidate {
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "BIXO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register as a company
    Company {
        email: String,
        #[arg(long)]
        company_name: String,
        #[arg(long, default_value = "")]
        industry: String,
        #[arg(long, env = "BIXO_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Summarize the stored tokens
    Show,
    /// Print the session as Set-Cookie headers
    Export,
}

#[derive(Subcommand)]
pub enum CandidateCommand {
    /// Show the candidate profile
    Profile,
    /// Update profile fields; unset flags are left unchanged
    Update(ProfileArgs),
    /// Show or hide the profile from companies
    Visibility {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        visible: bool,
    },
    /// List notifications
    Notifications,
    /// List recommendations received
    Recommendations,
    /// Approve a submitted recommendation
    Approve { id: String },
    /// Delete a recommendation
    DeleteRecommendation { id: String },
    /// Show skills grouped by capability
    Capabilities,
}

#[derive(Args, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub linkedin_url: Option<String>,
    #[arg(long)]
    pub desired_role: Option<String>,
    #[arg(long)]
    pub location_preference: Option<String>,
    #[arg(long)]
    pub remote: Option<RemotePreference>,
    #[arg(long)]
    pub availability: Option<Availability>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub open_to_opportunities: Option<bool>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub visible: Option<bool>,
}

impl ProfileArgs {
    pub fn into_update(self) -> CandidateProfileUpdate {
        CandidateProfileUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            linked_in_url: self.linkedin_url,
            desired_role: self.desired_role,
            location_preference: self.location_preference,
            location: None,
            remote_preference: self.remote,
            availability: self.availability,
            open_to_opportunities: self.open_to_opportunities,
            profile_visible: self.visible,
        }
    }
}

#[derive(Subcommand)]
pub enum TalentCommand {
    /// Search visible candidates
    Search {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
        /// Comma-separated skills
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        seniority: Option<SeniorityLevel>,
        #[arg(long)]
        availability: Option<Availability>,
    },
    /// Save a candidate
    Save { candidate_id: String },
    /// Remove a saved candidate
    Unsave { candidate_id: String },
    /// Message a candidate
    Message {
        candidate_id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        content: String,
    },
}

#[derive(Subcommand)]
pub enum ShortlistCommand {
    /// List shortlist requests
    List,
    /// Show a shortlist and its candidates
    Show { id: String },
    /// Request a new shortlist
    Request {
        role_title: String,
        /// Comma-separated technologies
        #[arg(long)]
        tech_stack: String,
        #[arg(long)]
        seniority: Option<SeniorityLevel>,
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RecommendationCommand {
    /// Show the form behind a recommendation link
    Show { token: String },
    /// Submit a recommendation
    Submit {
        token: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the recommendation text from a file
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
    /// Write rows as CSV instead of JSON
    #[arg(long)]
    pub csv: bool,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List candidates
    Candidates {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = BoolishValueParser::new())]
        visible: Option<bool>,
    },
    /// Show or hide a candidate
    CandidateVisibility {
        id: String,
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        visible: bool,
    },
    /// List companies
    Companies {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tier: Option<SubscriptionTier>,
    },
    /// Set a company's remaining message credits
    CompanyMessages { id: String, messages_remaining: i64 },
    /// List shortlist requests
    Shortlists {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        status: Option<ShortlistStatus>,
    },
    /// Move a shortlist to another status
    ShortlistStatus { id: String, status: ShortlistStatus },
    /// List recommendations awaiting review
    Recommendations {
        #[arg(long)]
        csv: bool,
    },
    /// Approve a recommendation
    Approve { id: String },
    /// Reject a recommendation
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Print the standard rejection reasons
    RejectionReasons,
}

#[derive(Subcommand)]
pub enum SkillsCommand {
    /// Group skills into capability areas
    Categorize {
        /// Skills, separately or comma-separated
        #[arg(required = true)]
        skills: Vec<String>,
        /// Skills shown per group
        #[arg(long)]
        limit: Option<usize>,
    },
}

// ===== Handlers =====

pub async fn handle_command(cli: Cli, config: ClientConfig) -> Result<()> {
    if let Command::Skills(command) = &cli.command {
        return handle_skills(command);
    }

    info!("Using API at {}", config.api_url);
    let api = Arc::new(ApiClient::from_config(&config)?);

    match cli.command {
        Command::Login { email, password } => {
            let auth = AuthSession::new(api);
            let signed_in = auth
                .login(&email, &password)
                .await
                .into_result()?
                .context("Login returned no account")?;
            println!("✅ Signed in as {} ({})", signed_in.email, signed_in.user_type);
        }

        Command::Register(command) => {
            let auth = AuthSession::new(api);
            let response = match command {
                RegisterCommand::Candidate {
                    email,
                    first_name,
                    last_name,
                    password,
                } => {
                    auth.register_candidate(&CandidateRegistration {
                        email,
                        password,
                        first_name,
                        last_name,
                    })
                    .await
                }
                RegisterCommand::Company {
                    email,
                    company_name,
                    industry,
                    password,
                } => {
                    auth.register_company(&CompanyRegistration {
                        email,
                        password,
                        company_name,
                        industry,
                    })
                    .await
                }
            };
            let registered = response
                .into_result()?
                .context("Registration returned no account")?;
            println!(
                "✅ Registered and signed in as {} ({})",
                registered.email, registered.user_type
            );
        }

        Command::Logout => {
            AuthSession::new(api).logout()?;
            println!("✅ Signed out");
        }

        Command::Whoami => {
            let auth = AuthSession::new(api);
            finish(auth.check_auth().await)?;
        }

        Command::Session(command) => handle_session(&api, &config, command)?,
        Command::Candidate(command) => handle_candidate(&api, command).await?,
        Command::Talent(command) => handle_talent(&api, command).await?,
        Command::Shortlists(command) => handle_shortlists(&api, command).await?,
        Command::Recommendation(command) => handle_recommendation(&api, command).await?,
        Command::Admin(command) => handle_admin(&api, command).await?,

        Command::Upload {
            endpoint,
            file,
            field,
        } => {
            let body = MultipartBody::from_path(&field, &file).await?;
            finish(api.upload_file::<Value>(&endpoint, &body).await)?;
        }

        Command::Skills(_) => {}
    }

    Ok(())
}

fn handle_session(api: &ApiClient, config: &ClientConfig, command: SessionCommand) -> Result<()> {
    let session = api.session();
    match command {
        SessionCommand::Show => {
            println!("API:           {}", api.base_url());
            println!("Session file:  {}", config.session_path.display());

            if !session.is_signed_in() {
                println!("Signed in:     no");
                return Ok(());
            }
            println!("Signed in:     yes");

            for cookie in session.cookies()? {
                println!(
                    "{:<14} {} (expires {})",
                    format!("{}:", cookie.name),
                    mask_token(&cookie.value),
                    cookie.expires_at.format("%Y-%m-%d %H:%M UTC")
                );
            }

            if let Some(claims) = session.token_claims() {
                if let Some(email) = &claims.email {
                    println!("Token email:   {}", email);
                }
                if let Some(expires) = claims.expires_at() {
                    println!("Token expiry:  {}", expires.format("%Y-%m-%d %H:%M:%S UTC"));
                }
            }
        }
        SessionCommand::Export => {
            for cookie in session.cookies()? {
                println!("Set-Cookie: {}", cookie.set_cookie_header());
            }
        }
    }
    Ok(())
}

async fn handle_candidate(api: &ApiClient, command: CandidateCommand) -> Result<()> {
    let candidates = api.candidates();
    match command {
        CandidateCommand::Profile => finish(candidates.profile().await),
        CandidateCommand::Update(args) => finish(candidates.update_profile(&args.into_update()).await),
        CandidateCommand::Visibility { visible } => finish(candidates.set_visibility(visible).await),
        CandidateCommand::Notifications => finish(candidates.notifications().await),
        CandidateCommand::Recommendations => {
            let recommendations = candidates.recommendations().await.into_result()?.unwrap_or_default();
            for recommendation in &recommendations {
                println!(
                    "{:<38} {:<24} {}",
                    recommendation.id,
                    recommendation.recommender_name,
                    recommendation.stage().label()
                );
            }
            Ok(())
        }
        CandidateCommand::Approve { id } => finish(candidates.approve_recommendation(&id).await),
        CandidateCommand::DeleteRecommendation { id } => {
            finish(candidates.delete_recommendation(&id).await)
        }
        CandidateCommand::Capabilities => {
            let profile = candidates
                .profile()
                .await
                .into_result()?
                .context("Profile response was empty")?;
            print_capabilities(
                &capabilities::profile_capabilities(&profile),
                Some(INLINE_SKILL_LIMIT),
            );
            Ok(())
        }
    }
}

async fn handle_talent(api: &ApiClient, command: TalentCommand) -> Result<()> {
    let companies = api.companies();
    match command {
        TalentCommand::Search {
            page,
            page_size,
            skills,
            seniority,
            availability,
        } => {
            let query = TalentQuery {
                page,
                page_size,
                skills,
                seniority,
                availability,
            };
            finish(companies.search_talent(&query).await)
        }
        TalentCommand::Save { candidate_id } => finish(companies.save_candidate(&candidate_id).await),
        TalentCommand::Unsave { candidate_id } => {
            finish(companies.unsave_candidate(&candidate_id).await)
        }
        TalentCommand::Message {
            candidate_id,
            subject,
            content,
        } => finish(
            companies
                .send_message(&candidate_id, subject.as_deref(), &content)
                .await,
        ),
    }
}

async fn handle_shortlists(api: &ApiClient, command: ShortlistCommand) -> Result<()> {
    let shortlists = api.shortlists();
    match command {
        ShortlistCommand::List => finish(shortlists.list().await),
        ShortlistCommand::Show { id } => finish(shortlists.get(&id).await),
        ShortlistCommand::Request {
            role_title,
            tech_stack,
            seniority,
            remote,
            city,
            country,
            timezone,
            notes,
        } => {
            let request = NewShortlist {
                role_title,
                tech_stack,
                seniority,
                hiring_location: HiringLocation {
                    is_remote: remote,
                    city: non_empty(city.as_deref()),
                    country: non_empty(country.as_deref()),
                    timezone: non_empty(timezone.as_deref()),
                    display_text: None,
                },
                notes,
            };
            let created = shortlists
                .request(&request)
                .await
                .into_result()?
                .context("Shortlist request returned no id")?;
            println!("✅ Shortlist requested: {}", created.id);
            Ok(())
        }
    }
}

async fn handle_recommendation(api: &ApiClient, command: RecommendationCommand) -> Result<()> {
    let recommendations = api.recommendations();
    match command {
        RecommendationCommand::Show { token } => finish(recommendations.form(&token).await),
        RecommendationCommand::Submit {
            token,
            content,
            content_file,
            role,
            company,
        } => {
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };
            let submission = SubmitRecommendation {
                content,
                recommender_role: role,
                recommender_company: company,
            };
            finish(recommendations.submit(&token, &submission).await)
        }
    }
}

async fn handle_admin(api: &ApiClient, command: AdminCommand) -> Result<()> {
    let admin = api.admin();
    match command {
        AdminCommand::Candidates {
            paging,
            search,
            visible,
        } => {
            let filter = CandidateFilter {
                page: paging.page,
                page_size: paging.page_size,
                search,
                visible,
            };
            let page = admin.candidates(&filter).await.into_result()?.unwrap_or_default();
            print_rows(&page.items, paging.csv)?;
            print_page_footer(page.total_count, page.page, page.page_size, paging.csv);
            Ok(())
        }
        AdminCommand::CandidateVisibility { id, visible } => {
            finish(admin.set_candidate_visibility(&id, visible).await)
        }
        AdminCommand::Companies {
            paging,
            search,
            tier,
        } => {
            let filter = CompanyFilter {
                page: paging.page,
                page_size: paging.page_size,
                search,
                tier,
            };
            let page = admin.companies(&filter).await.into_result()?.unwrap_or_default();
            print_rows(&page.items, paging.csv)?;
            print_page_footer(page.total_count, page.page, page.page_size, paging.csv);
            Ok(())
        }
        AdminCommand::CompanyMessages {
            id,
            messages_remaining,
        } => finish(admin.set_company_messages(&id, messages_remaining).await),
        AdminCommand::Shortlists { paging, status } => {
            let filter = ShortlistFilter {
                page: paging.page,
                page_size: paging.page_size,
                status,
            };
            let rows = admin.shortlists(&filter).await.into_result()?.unwrap_or_default();
            print_rows(&rows, paging.csv)
        }
        AdminCommand::ShortlistStatus { id, status } => {
            finish(admin.update_shortlist_status(&id, status).await)
        }
        AdminCommand::Recommendations { csv } => {
            let rows = admin.recommendations().await.into_result()?.unwrap_or_default();
            print_rows(&rows, csv)
        }
        AdminCommand::Approve { id } => finish(admin.approve_recommendation(&id).await),
        AdminCommand::Reject { id, reason } => finish(admin.reject_recommendation(&id, &reason).await),
        AdminCommand::RejectionReasons => {
            for reason in REJECTION_REASONS {
                println!("{}", reason);
            }
            Ok(())
        }
    }
}

fn handle_skills(command: &SkillsCommand) -> Result<()> {
    match command {
        SkillsCommand::Categorize { skills, limit } => {
            let names: Vec<String> = skills.iter().flat_map(|s| split_list(s)).collect();
            let grouped = capabilities::derive_capabilities(&names);
            if grouped.is_empty() {
                println!("No capability groups matched");
            }
            print_capabilities(&grouped, *limit);
        }
    }
    Ok(())
}

// ===== Output =====

/// Prints the payload of a successful response; failures become errors.
fn finish<T: Serialize>(response: ApiResponse<T>) -> Result<()> {
    match response.into_result()? {
        Some(data) => print_json(&data),
        None => {
            println!("✅ Done");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to format response")?;
    println!("{}", rendered);
    Ok(())
}

fn print_capabilities(grouped: &crate::types::Capabilities, limit: Option<usize>) {
    for (group, skills) in capabilities::ordered_groups(grouped, limit) {
        let hidden = grouped.get(&group).map_or(0, |all| all.len() - skills.len());
        if hidden > 0 {
            println!("{}: {} +{}", group, skills.join(", "), hidden);
        } else {
            println!("{}: {}", group, skills.join(", "));
        }
    }
}

fn print_page_footer(total_count: u64, page: u32, page_size: u32, csv: bool) {
    if csv {
        return;
    }
    let size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    eprintln!(
        "Page {} of {} ({} total)",
        page.max(1),
        utils::total_pages(total_count, size).max(1),
        total_count
    );
}

fn print_rows<R: CsvRow + Serialize>(rows: &[R], csv: bool) -> Result<()> {
    if !csv {
        return print_json(rows);
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer
        .write_record(R::HEADERS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .write_record(row.record())
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Flat rendering of an admin listing row.
trait CsvRow {
    const HEADERS: &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn opt_label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvRow for AdminCandidate {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "desired_role",
        "availability",
        "seniority",
        "visible",
        "skills",
        "profile_views",
        "created_at",
    ];

    fn record(&self) -> Vec<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        vec![
            self.id.clone(),
            name,
            self.email.clone(),
            opt_text(self.desired_role.as_deref()),
            self.availability.to_string(),
            opt_label(self.seniority_estimate),
            self.profile_visible.to_string(),
            self.skills_count.to_string(),
            self.profile_views_count.to_string(),
            self.created_at.clone(),
        ]
    }
}

impl CsvRow for AdminCompany {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "company_name",
        "email",
        "industry",
        "tier",
        "messages_remaining",
        "shortlists",
        "saved_candidates",
        "created_at",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.company_name.clone(),
            self.email.clone(),
            opt_text(self.industry.as_deref()),
            self.subscription_tier.to_string(),
            self.messages_remaining.to_string(),
            self.shortlists_count.to_string(),
            self.saved_candidates_count.to_string(),
            self.created_at.clone(),
        ]
    }
}

impl CsvRow for AdminShortlist {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "company_name",
        "role_title",
        "tech_stack",
        "seniority",
        "location",
        "remote_allowed",
        "status",
        "candidates",
        "created_at",
    ];

    fn record(&self) -> Vec<String> {
        let location = self
            .hiring_location
            .as_ref()
            .and_then(|l| l.summary())
            .or_else(|| self.location_preference.clone());
        vec![
            self.id.clone(),
            self.company_name.clone(),
            self.role_title.clone(),
            self.tech_stack_required.join("; "),
            opt_label(self.seniority_required),
            location.unwrap_or_default(),
            self.remote_allowed.to_string(),
            self.status.to_string(),
            self.candidates_count.to_string(),
            self.created_at.clone(),
        ]
    }
}

impl CsvRow for AdminRecommendation {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "candidate_name",
        "recommender_name",
        "recommender_email",
        "relationship",
        "submitted_at",
        "content",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.candidate_name.clone(),
            self.recommender_name.clone(),
            opt_text(self.recommender_email.as_deref()),
            opt_text(self.relationship.as_deref()),
            opt_text(self.submitted_at.as_deref()),
            self.content.clone(),
        ]
    }
}
