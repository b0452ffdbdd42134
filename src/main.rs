mod telemetry;

use skifte_api::Application;
use skifte_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("skifte".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("Failed to run database migrations");

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
