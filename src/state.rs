use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    AnnouncementService, AttendanceService, AuditService, AuthService, ExpenseService,
    LeaveService, Notifier, ReviewService, RoleService, SeaOrmAuthService, SeaOrmRoleService,
    TaskService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub event_bus: broadcast::Sender<NotificationEvent>,

    pub notifier: Notifier,

    pub auth_service: Arc<dyn AuthService>,

    pub role_service: Arc<dyn RoleService>,

    pub leave_service: LeaveService,

    pub attendance_service: AttendanceService,

    pub expense_service: ExpenseService,

    pub announcement_service: AnnouncementService,

    pub task_service: TaskService,

    pub review_service: ReviewService,

    pub audit_service: Arc<AuditService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        Self::init_with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        Self::init_with_event_bus(config, event_bus).await
    }

    async fn init_with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let config_arc = Arc::new(RwLock::new(config));

        let notifier = Notifier::new(store.clone(), event_bus.clone());

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config_arc.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let role_service = Arc::new(SeaOrmRoleService::new(store.clone(), event_bus.clone()))
            as Arc<dyn RoleService + Send + Sync + 'static>;

        let leave_service = LeaveService::new(store.clone(), notifier.clone());
        let attendance_service = AttendanceService::new(store.clone());
        let expense_service = ExpenseService::new(store.clone(), notifier.clone());
        let announcement_service = AnnouncementService::new(store.clone(), notifier.clone());
        let task_service = TaskService::new(store.clone(), notifier.clone());
        let review_service = ReviewService::new(store.clone(), notifier.clone());

        let audit_service = Arc::new(AuditService::new(store.clone(), event_bus.clone()));
        audit_service.clone().start_listener();

        Ok(Self {
            config: config_arc,
            store,
            event_bus,
            notifier,
            auth_service,
            role_service,
            leave_service,
            attendance_service,
            expense_service,
            announcement_service,
            task_service,
            review_service,
            audit_service,
        })
    }
}
