use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use feed_core::{
    compose_post, format::comment_meta, logging::init_tracing, FeedConfig, FeedNavigator,
    FeedSession, FlashColor, PostCard, SortOption, VoteDirection,
};
use hottake_api::{ApiConfig, HotTakeApi, HotTakeClient, Post};

/// Prints feed callbacks instead of animating them
struct ConsoleNavigator;

impl FeedNavigator for ConsoleNavigator {
    fn flash(&self, color: FlashColor) {
        println!("[flash {}]", color.as_str());
    }

    fn advance(&self) {
        println!("[next card]");
    }
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  hottake-cli posts [sort] [offset] [limit]");
    eprintln!("  hottake-cli feed [sort]");
    eprintln!("  hottake-cli post <post_id>");
    eprintln!("  hottake-cli create <title...>");
    eprintln!("  hottake-cli agree <post_id>");
    eprintln!("  hottake-cli disagree <post_id>");
    eprintln!("  hottake-cli comments <post_id>");
    eprintln!("  hottake-cli comment <post_id> <text...>");
    std::process::exit(1);
}

fn print_post(post: &Post) {
    println!(
        "{:<24} +{:<4} -{:<4} {}",
        post.id,
        post.agree.len(),
        post.disagree.len(),
        post.title
    );
}

async fn vote(
    api: Arc<dyn HotTakeApi>,
    config: &FeedConfig,
    post_id: &str,
    direction: VoteDirection,
) -> Result<()> {
    let post = api.fetch_post(post_id).await?;
    let card = PostCard::new(post, api, Arc::new(ConsoleNavigator), config);

    let outcome = card
        .votes()
        .cast_vote(direction)
        .await
        .with_context(|| format!("{} on {} failed", direction, post_id))?;

    println!(
        "{}: +{} -{} (heat {})",
        direction,
        outcome.state.agree_count(),
        outcome.state.disagree_count(),
        outcome.state.heat().unwrap_or_default()
    );

    // Let the advance timer fire before the card goes away
    tokio::time::sleep(config.advance_delay + std::time::Duration::from_millis(50)).await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let api_config = ApiConfig::from_env()?;
    let config = FeedConfig::from_env()?;
    let api: Arc<dyn HotTakeApi> = Arc::new(HotTakeClient::new(api_config));

    match args[1].as_str() {
        "posts" => {
            let sort = args.get(2).map(String::as_str).unwrap_or("new");
            let offset = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(0);
            let limit = args
                .get(4)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(config.page_size);
            for post in api.fetch_posts(sort, offset, limit).await? {
                print_post(&post);
            }
        }
        "feed" => {
            let sort = match args.get(2) {
                Some(value) => SortOption::parse(value)
                    .with_context(|| format!("unknown sort '{}'", value))?,
                None => config.default_sort,
            };
            let feed = FeedSession::new(Arc::clone(&api), config.clone());
            feed.load(sort).await?;
            println!("{} ({} posts)", sort.label(), feed.len());
            for post in feed.posts() {
                print_post(&post);
            }
        }
        "post" if args.len() == 3 => {
            print_post(&api.fetch_post(&args[2]).await?);
        }
        "create" if args.len() >= 3 => {
            let title = args[2..].join(" ");
            let post = compose_post(api.as_ref(), &title).await?;
            println!("Created {}", post.id);
        }
        "agree" if args.len() == 3 => {
            vote(api, &config, &args[2], VoteDirection::Agree).await?;
        }
        "disagree" if args.len() == 3 => {
            vote(api, &config, &args[2], VoteDirection::Disagree).await?;
        }
        "comments" if args.len() == 3 => {
            for comment in api.fetch_comments(&args[2]).await? {
                println!("{}\n  {}", comment_meta(&comment), comment.content);
            }
        }
        "comment" if args.len() >= 4 => {
            let post = api.fetch_post(&args[2]).await?;
            let mut card = PostCard::new(post, api, Arc::new(ConsoleNavigator), &config);
            let thread = card.comments_mut();
            thread.set_draft(args[3..].join(" "));
            match thread.submit().await? {
                Some(comment) => println!("Added comment {}", comment.id),
                None => println!("Nothing to send"),
            }
        }
        _ => usage(),
    }

    Ok(())
}
