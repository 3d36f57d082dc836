#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    salon_booking::run().await;
}
