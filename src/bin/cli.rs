use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    forms_question::cli::run().await
}
