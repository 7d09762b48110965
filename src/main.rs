use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use enroll_portal::config::AppConfig;
use enroll_portal::error::AppError;
use enroll_portal::telemetry;
use enroll_portal::workflows::enrollment::{
    enrollment_router, Actor, AllocatorConfig, ApplicantId, ApprovalStatus, AuditSink,
    EnrollmentRegistry, EnrollmentService, EnrollmentSubmission, Gender, Lrn, MemoryAuditLog,
    MemoryRegistry, Track,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Enrollment Portal",
    about = "Run the enrollment portal service or walk the allocation workflow from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed an in-memory registry and walk approvals, capacity changes, and
    /// section lifecycle end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Global enrollment limit used for the walkthrough (floor 50 applies)
    #[arg(long, default_value_t = 60)]
    capacity: u32,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    // The hosted relational store is an external collaborator; the in-memory
    // registry stands behind the same trait until that client is wired in.
    let registry = Arc::new(MemoryRegistry::default());
    let audit = Arc::new(MemoryAuditLog::default());
    let service = Arc::new(EnrollmentService::new(
        registry,
        audit,
        config.allocation.allocator_config(),
    ));

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops_state);

    let app = enrollment_router(service).merge(ops).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let capacity = args.capacity.max(50);
    let registry = Arc::new(MemoryRegistry::with_capacity(capacity));
    let audit = Arc::new(MemoryAuditLog::default());
    let service = EnrollmentService::new(registry, audit, AllocatorConfig::default());
    let registrar = Actor {
        id: "demo-registrar".to_string(),
        name: "Demo Registrar".to_string(),
    };

    println!("Enrollment allocation demo (global capacity {capacity})");

    for track in Track::ALL {
        let first = service.add_section(&registrar, track)?;
        let second = service.add_section(&registrar, track)?;
        println!("Created sections {first} and {second}");
    }

    let mut ids: Vec<ApplicantId> = Vec::new();
    for (index, (last, first, track, gender)) in demo_roster().iter().enumerate() {
        let lrn = Lrn::new(&format!("1368420000{index:02}"))
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        let applicant = service.register(EnrollmentSubmission {
            lrn,
            last_name: (*last).to_string(),
            first_name: (*first).to_string(),
            track: *track,
            gender: *gender,
        })?;
        ids.push(applicant.id);
    }
    println!("Registered {} applicants", ids.len());

    let outcome = service.bulk_set_status(&registrar, &ids, ApprovalStatus::Approved)?;
    println!(
        "Approved {} applicant(s), {} failure(s)",
        outcome.applied,
        outcome.failed.len()
    );

    print_rosters(&service)?;

    println!("\nRaising global capacity to {}", capacity + 20);
    let report = service.set_global_capacity(&registrar, capacity + 20)?;
    for summary in &report.tracks {
        println!("- {}: {}", summary.track.strand(), summary.ratio());
    }

    println!("\nAdding a third ICT section");
    let label = service.add_section(&registrar, Track::Ict)?;
    println!("Created {label}");

    let sections = service.sections(Track::Ict)?;
    if let Some(second) = sections.get(1) {
        println!("Deleting {} and collapsing letters", second.name());
        service.delete_section(&registrar, second.id, Track::Ict)?;
    }

    print_rosters(&service)?;
    Ok(())
}

fn print_rosters<R, A>(service: &EnrollmentService<R, A>) -> Result<(), AppError>
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    for track in Track::ALL {
        println!("\n{} roster", track.strand());
        let roster = service.roster(track)?;
        for section in service.sections(track)? {
            let occupants: Vec<String> = roster
                .iter()
                .filter(|applicant| {
                    applicant
                        .seat
                        .as_ref()
                        .is_some_and(|seat| seat.section_id == section.id)
                })
                .map(|applicant| {
                    format!(
                        "{}, {} ({})",
                        applicant.last_name,
                        applicant.first_name,
                        applicant.gender.label()
                    )
                })
                .collect();
            println!(
                "- {} (capacity {}): {}",
                section.name(),
                section.capacity,
                if occupants.is_empty() {
                    "empty".to_string()
                } else {
                    occupants.join("; ")
                }
            );
        }
    }
    Ok(())
}

fn demo_roster() -> Vec<(&'static str, &'static str, Track, Gender)> {
    vec![
        ("Reyes", "Ana", Track::Ict, Gender::Female),
        ("Santos", "Miguel", Track::Ict, Gender::Male),
        ("Cruz", "Liza", Track::Ict, Gender::Female),
        ("Bautista", "Paolo", Track::Ict, Gender::Male),
        ("Garcia", "Mara", Track::Ict, Gender::Female),
        ("Torres", "Jun", Track::Ict, Gender::Male),
        ("Flores", "Bea", Track::Ict, Gender::Female),
        ("Ramos", "Carlo", Track::Ict, Gender::Male),
        ("Aquino", "Tala", Track::Gas, Gender::Female),
        ("Villanueva", "Rico", Track::Gas, Gender::Male),
        ("Mendoza", "Ising", Track::Gas, Gender::Female),
        ("Ocampo", "Dado", Track::Gas, Gender::Male),
        ("Navarro", "Luz", Track::Gas, Gender::Female),
        ("Domingo", "Ner", Track::Gas, Gender::Male),
    ]
}
