use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = splice_probe::Args::parse();
	splice_probe::run(args).await
}
