use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();
    destination_sync_engine::run().await;
}
