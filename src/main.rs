#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    task_detail_server::run().await
}
