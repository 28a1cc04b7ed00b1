//! CLI binary for the OpenAlex client.
//!
//! Usage: openalex search "graph neural networks" --from-date 2020-01-01 -n 10

#[cfg(feature = "cli")]
mod cli {
    use clap::{ArgAction, Args, Parser, Subcommand};
    use openalex_client::error::Result;
    use openalex_client::format::{bibtex, json, table, OutputMode};
    use openalex_client::query::DEFAULT_PER_PAGE;
    use openalex_client::{
        fields, EntityKind, ListOptions, ListResponse, OpenAlexClient, OpenAlexError, WorkFilters,
        WorkSearch,
    };
    use serde_json::Value;
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    #[derive(Parser)]
    #[command(name = "openalex", about = "OpenAlex scholarly metadata client", version)]
    pub struct Cli {
        /// Contact email for the polite pool (higher rate limits)
        #[arg(long, global = true, env = "OPENALEX_EMAIL")]
        email: Option<String>,

        /// Output as JSON
        #[arg(long, global = true, conflicts_with = "bibtex")]
        json: bool,

        /// Output works as BibTeX
        #[arg(long, global = true)]
        bibtex: bool,

        /// Log more to stderr (-v info, -vv debug)
        #[arg(short, long, global = true, action = ArgAction::Count)]
        verbose: u8,

        #[arg(long, global = true, env = "OPENALEX_BASE_URL", hide = true)]
        base_url: Option<String>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Args)]
    struct PageArgs {
        /// Number of results per page
        #[arg(short = 'n', long = "limit", default_value_t = DEFAULT_PER_PAGE)]
        limit: u32,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    }

    #[derive(Args)]
    struct ListArgs {
        /// OpenAlex filter string (e.g. "type:article,is_oa:true")
        #[arg(short, long)]
        filter: Option<String>,
        /// Sort field (e.g. cited_by_count:desc)
        #[arg(long)]
        sort: Option<String>,
        /// Group results by field
        #[arg(long)]
        group_by: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    }

    #[derive(Args)]
    struct WorkFilterArgs {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,
        /// Only works cited more than N times
        #[arg(long)]
        min_citations: Option<u32>,
        /// Only open access works
        #[arg(long, visible_alias = "oa")]
        open_access: bool,
        /// Work type (article, book, dataset, ...)
        #[arg(long = "type")]
        work_type: Option<String>,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Search for works
        Search {
            /// Search query
            query: String,
            #[command(flatten)]
            list: ListArgs,
            #[command(flatten)]
            filters: WorkFilterArgs,
        },
        /// Get work(s) by OpenAlex ID, DOI, PMID, PMCID or MAG ID
        Work {
            #[arg(required = true)]
            ids: Vec<String>,
        },
        /// Export BibTeX for work(s)
        Bibtex {
            #[arg(required = true)]
            ids: Vec<String>,
        },
        /// Works that cite a work
        Citations {
            id: String,
            #[command(flatten)]
            paging: PageArgs,
        },
        /// Works cited by a work
        References {
            id: String,
            #[command(flatten)]
            paging: PageArgs,
        },
        /// Look up authors (OpenAlex ID or ORCID)
        Author {
            #[command(subcommand)]
            action: EntityAction,
        },
        /// Look up institutions (OpenAlex ID or ROR)
        Institution {
            #[command(subcommand)]
            action: EntityAction,
        },
        /// Look up sources (OpenAlex ID or ISSN)
        Source {
            #[command(subcommand)]
            action: EntityAction,
        },
    }

    #[derive(Subcommand)]
    enum EntityAction {
        /// Get one entity by ID
        Get { id: String },
        /// Search by name
        Search {
            query: String,
            #[command(flatten)]
            list: ListArgs,
        },
        /// List the entity's works, newest first
        Works {
            id: String,
            #[command(flatten)]
            list: ListArgs,
            #[command(flatten)]
            filters: WorkFilterArgs,
        },
    }

    impl From<&PageArgs> for ListOptions {
        fn from(args: &PageArgs) -> Self {
            ListOptions {
                page: args.page,
                per_page: args.limit,
                ..Default::default()
            }
        }
    }

    impl From<&ListArgs> for ListOptions {
        fn from(args: &ListArgs) -> Self {
            ListOptions {
                filter: args.filter.clone(),
                sort: args.sort.clone(),
                group_by: args.group_by.clone(),
                ..ListOptions::from(&args.paging)
            }
        }
    }

    impl From<&WorkFilterArgs> for WorkFilters {
        fn from(args: &WorkFilterArgs) -> Self {
            WorkFilters {
                from_date: args.from_date.clone(),
                to_date: args.to_date.clone(),
                min_citations: args.min_citations,
                open_access: args.open_access,
                work_type: args.work_type.clone(),
            }
        }
    }

    fn work_search(list: &ListArgs, filters: &WorkFilterArgs) -> WorkSearch {
        WorkSearch {
            list: list.into(),
            filters: filters.into(),
        }
    }

    /// Where and how results are printed.
    struct Output {
        mode: OutputMode,
        pretty: bool,
    }

    impl Output {
        fn from_flags(cli: &Cli, stdout_is_terminal: bool) -> Self {
            let mode = if matches!(cli.command, Commands::Bibtex { .. }) {
                OutputMode::BibTeX
            } else {
                OutputMode::resolve(cli.json, cli.bibtex, stdout_is_terminal)
            };
            Self {
                mode,
                pretty: stdout_is_terminal,
            }
        }

        /// Mode for listings that have no BibTeX rendering.
        fn without_bibtex(&self) -> OutputMode {
            match self.mode {
                OutputMode::BibTeX if self.pretty => OutputMode::Table,
                OutputMode::BibTeX => OutputMode::Json,
                mode => mode,
            }
        }

        fn list_mode(&self, kind: EntityKind, group_by: Option<&str>) -> OutputMode {
            if group_by.is_some() || kind != EntityKind::Work {
                self.without_bibtex()
            } else {
                self.mode
            }
        }

        fn render_list(
            &self,
            kind: EntityKind,
            response: &ListResponse,
            group_by: Option<&str>,
        ) -> Result<String> {
            let meta = Some(&response.meta);
            Ok(match (self.list_mode(kind, group_by), group_by) {
                (OutputMode::Json, Some(_)) => json::list(&response.group_by, meta, self.pretty)?,
                (OutputMode::Json, None) => json::list(&response.results, meta, self.pretty)?,
                (OutputMode::BibTeX, _) => bibtex::format_works(&response.results),
                (OutputMode::Table, _) => table::list(kind, response, group_by),
            })
        }

        fn render_entity(&self, kind: EntityKind, entity: &Value) -> Result<String> {
            Ok(match self.without_bibtex() {
                OutputMode::Table => table::entity_detail(kind, entity),
                _ => json::entity(entity, self.pretty)?,
            })
        }

        /// One work gets the detail view, several get a listing.
        fn render_works(&self, works: &[Value]) -> Result<String> {
            Ok(match (self.mode, works) {
                (OutputMode::BibTeX, _) => bibtex::format_works(works),
                (OutputMode::Json, [work]) => json::entity(work, self.pretty)?,
                (OutputMode::Json, _) => json::list(works, None, self.pretty)?,
                (OutputMode::Table, [work]) => table::work_detail(work),
                (OutputMode::Table, _) => table::works(works, None),
            })
        }

        fn list(&self, kind: EntityKind, response: &ListResponse, group_by: Option<&str>) -> Result<()> {
            println!("{}", self.render_list(kind, response, group_by)?);
            Ok(())
        }

        fn entity(&self, kind: EntityKind, entity: &Value) -> Result<()> {
            println!("{}", self.render_entity(kind, entity)?);
            Ok(())
        }

        fn works(&self, works: &[Value]) -> Result<()> {
            println!("{}", self.render_works(works)?);
            Ok(())
        }

        fn error(&self, err: &OpenAlexError) {
            if self.mode == OutputMode::Json {
                match json::error(err, self.pretty) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {err}"),
                }
                return;
            }
            eprintln!("Error: {err}");
            if let Some(suggestion) = err.suggestion() {
                eprintln!("{suggestion}");
            }
        }
    }

    fn init_tracing(verbose: u8) {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }

    fn make_client(cli: &Cli) -> Result<OpenAlexClient> {
        let client = OpenAlexClient::new(cli.email.clone())?;
        Ok(match &cli.base_url {
            Some(url) => client.with_base_url(url.as_str()),
            None => client,
        })
    }

    async fn run_entity(
        client: &OpenAlexClient,
        output: &Output,
        kind: EntityKind,
        action: &EntityAction,
    ) -> Result<()> {
        match action {
            EntityAction::Get { id } => {
                let entity = client.get(kind, id).await?;
                output.entity(kind, &entity)
            }
            EntityAction::Search { query, list } => {
                let response = client.search(kind, query, &list.into()).await?;
                output.list(kind, &response, list.group_by.as_deref())
            }
            EntityAction::Works { id, list, filters } => {
                let response = client.works_of(kind, id, &work_search(list, filters)).await?;
                output.list(EntityKind::Work, &response, list.group_by.as_deref())
            }
        }
    }

    async fn execute(cli: &Cli, output: &Output) -> Result<()> {
        let client = make_client(cli)?;

        match &cli.command {
            Commands::Search {
                query,
                list,
                filters,
            } => {
                let response = client.search_works(query, &work_search(list, filters)).await?;
                output.list(EntityKind::Work, &response, list.group_by.as_deref())
            }

            Commands::Work { ids } => {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                let select = if output.mode == OutputMode::BibTeX {
                    fields::BIBTEX_WORK
                } else {
                    fields::WORK
                };
                let works = client.get_works(&ids, select).await?;
                output.works(&works)
            }

            Commands::Bibtex { ids } => {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                let works = client.get_works(&ids, fields::BIBTEX_WORK).await?;
                println!("{}", bibtex::format_works(&works));
                Ok(())
            }

            Commands::Citations { id, paging } => {
                let response = client.citations(id, &paging.into()).await?;
                output.list(EntityKind::Work, &response, None)
            }

            Commands::References { id, paging } => {
                let response = client.references(id, &paging.into()).await?;
                output.list(EntityKind::Work, &response, None)
            }

            Commands::Author { action } => {
                run_entity(&client, output, EntityKind::Author, action).await
            }
            Commands::Institution { action } => {
                run_entity(&client, output, EntityKind::Institution, action).await
            }
            Commands::Source { action } => {
                run_entity(&client, output, EntityKind::Source, action).await
            }
        }
    }

    /// Parse arguments, run the command and report failures.
    ///
    /// Returns `false` when the command failed.
    pub async fn run() -> bool {
        let cli = Cli::parse();
        init_tracing(cli.verbose);

        let output = Output::from_flags(&cli, std::io::stdout().is_terminal());

        match execute(&cli, &output).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = ?e, "command failed");
                output.error(&e);
                false
            }
        }
    }

}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if !cli::run().await {
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
