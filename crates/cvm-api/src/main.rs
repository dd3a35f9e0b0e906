#[tokio::main]
async fn main() -> Result<(), cvm_api::error::ApiError> {
    cvm_api::run().await
}
