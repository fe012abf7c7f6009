use crate::infra::{seed_demo_pipeline, InMemoryPipelineRepository, DEMO_AGENCY};
use async_trait::async_trait;
use chrono::Duration;
use clap::Args;
use std::sync::Arc;
use talentflow::error::AppError;
use talentflow::workflows::pipeline::{
    Actor, AgencyId, ApplicationId, ApplicationStatus, BoardController, BoardState, GatewayError,
    MemberRole, MoveError, MoveResolution, Notice, NoticeError, NoticePublisher, PipelineService,
    PipelineView, StatusGateway,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// How many seconds a transient board notice stays visible.
    #[arg(long, default_value_t = 4)]
    pub(crate) notice_seconds: i64,
    /// Skip the failing-move portion of the session.
    #[arg(long)]
    pub(crate) skip_failure: bool,
}

/// Gateway that performs the status update against the in-process service,
/// standing in for the HTTP round trip a browser client would make.
struct ServiceGateway {
    service: Arc<PipelineService<InMemoryPipelineRepository>>,
    actor: Actor,
}

#[async_trait]
impl StatusGateway for ServiceGateway {
    async fn update_status(
        &self,
        application_id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<(), GatewayError> {
        self.service
            .move_status(&self.actor, application_id, to.as_str())
            .map(|_| ())
            .map_err(|error| match error {
                MoveError::Repository(_) => GatewayError::Network(error.to_string()),
                MoveError::UnknownStatus(_) => GatewayError::Rejected {
                    status: 422,
                    message: error.to_string(),
                },
                MoveError::ApplicationNotFound => GatewayError::Rejected {
                    status: 404,
                    message: error.to_string(),
                },
                MoveError::Forbidden => GatewayError::Rejected {
                    status: 403,
                    message: error.to_string(),
                },
            })
    }
}

/// Gateway with the network cable pulled out.
struct OfflineGateway;

#[async_trait]
impl StatusGateway for OfflineGateway {
    async fn update_status(
        &self,
        _application_id: &ApplicationId,
        _to: ApplicationStatus,
    ) -> Result<(), GatewayError> {
        Err(GatewayError::Network("connection refused".to_string()))
    }
}

/// Notice transport for the terminal session.
struct StdoutNotices;

impl NoticePublisher for StdoutNotices {
    fn publish(&self, notice: Notice) -> Result<(), NoticeError> {
        println!("  [toast/{:?}] {}", notice.level, notice.message);
        Ok(())
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        notice_seconds,
        skip_failure,
    } = args;
    let notice_duration = Duration::seconds(notice_seconds);

    println!("Pipeline board demo");

    let repository = Arc::new(InMemoryPipelineRepository::default());
    let job = seed_demo_pipeline(&repository)?;
    let service = Arc::new(PipelineService::new(repository));
    let actor = Actor {
        member_id: "mem-demo-recruiter".to_string(),
        agency_id: AgencyId(DEMO_AGENCY.to_string()),
        role: MemberRole::Recruiter,
    };

    let view = match service.load_pipeline(&actor, &job.id) {
        Ok(view) => view,
        Err(err) => {
            println!("  Board unavailable: {err}");
            return Ok(());
        }
    };
    render_board(&view);

    println!("\nMove 1: drag the newest applicant from New to Contacted");
    let gateway = Arc::new(ServiceGateway {
        service: service.clone(),
        actor: actor.clone(),
    });
    let notices = Arc::new(StdoutNotices);
    let mut controller = BoardController::new(
        BoardState::from_view(&view, notice_duration),
        gateway,
        notices.clone(),
        true,
    );

    let moved = ApplicationId("app-0001".to_string());
    match controller
        .move_application(
            moved.clone(),
            ApplicationStatus::New,
            ApplicationStatus::Contacted,
        )
        .await
    {
        Ok(MoveResolution::Committed) => {
            println!("  Committed; the card stays where it was dropped.")
        }
        Ok(MoveResolution::RolledBack) => println!("  Rolled back; see the notice above."),
        Err(rejected) => println!("  Gesture rejected before any request: {rejected}"),
    }
    for status in ApplicationStatus::ordered() {
        let cards = controller.state().columns.column(status);
        println!("  {}: {} cards", status.label(), cards.len());
    }

    if !skip_failure {
        println!("\nMove 2: the same gesture while the service is unreachable");
        let mut offline = BoardController::new(
            controller.state().clone(),
            Arc::new(OfflineGateway),
            notices,
            true,
        );
        match offline
            .move_application(
                moved,
                ApplicationStatus::Contacted,
                ApplicationStatus::Qualified,
            )
            .await
        {
            Ok(MoveResolution::RolledBack) => {
                println!("  Rolled back; the board matches its pre-drag snapshot.")
            }
            Ok(MoveResolution::Committed) => println!("  Committed unexpectedly."),
            Err(rejected) => println!("  Gesture rejected before any request: {rejected}"),
        }
        for status in ApplicationStatus::ordered() {
            let cards = offline.state().columns.column(status);
            println!("  {}: {} cards", status.label(), cards.len());
        }
    }

    println!("\nServer state after the session");
    match service.load_pipeline(&actor, &job.id) {
        Ok(view) => render_board(&view),
        Err(err) => println!("  Board unavailable: {err}"),
    }

    Ok(())
}

fn render_board(view: &PipelineView) {
    println!(
        "Job {} ({} applications)",
        view.job.title, view.total_applications
    );
    for column in &view.columns {
        if column.applications.is_empty() {
            println!("- {}: empty", column.label);
            continue;
        }
        let names: Vec<&str> = column
            .applications
            .iter()
            .map(|card| card.candidate_name.as_str())
            .collect();
        println!("- {}: {}", column.label, names.join(", "));
    }
}
