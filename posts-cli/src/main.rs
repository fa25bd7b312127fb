use clap::{Parser, Subcommand};
use posts_client::{Post, PostId, PostsClient, PostsGrpcClient, PostsHttpClient};

#[derive(Parser, Debug)]
#[command(about = "Command-line client for the posts server")]
struct Cli {
    /// Talk to the gRPC endpoint instead of the REST API
    #[arg(short, long)]
    grpc: bool,

    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every post, newest first
    List,
    /// List published posts, newest first
    ListPublished,
    Get {
        id: PostId,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Update {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: PostId,
    },
    Publish {
        id: PostId,
    },
    Unpublish {
        id: PostId,
    },
}

fn print_posts(posts: &[Post]) {
    println!("Posts ({})", posts.len());
    for post in posts {
        println!("- {}", post);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client: Box<dyn PostsClient> = if args.grpc {
        let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:50051");
        Box::new(PostsGrpcClient::connect(endpoint).await?)
    } else {
        let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:8080");
        Box::new(PostsHttpClient::connect(endpoint).await?)
    };

    match args.command {
        Command::List => print_posts(&client.list_posts().await?),
        Command::ListPublished => print_posts(&client.list_published_posts().await?),
        Command::Get { id } => {
            let post = client.get_post(id).await?;
            println!("{}\n\n{}", post, post.content);
        }
        Command::Create { title, content } => {
            let post = client.create_post(title, content).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Update { id, title, content } => {
            let post = client.update_post(id, title, content).await?;
            println!("Post updated: {}", post);
        }
        Command::Delete { id } => {
            let post = client.delete_post(id).await?;
            println!("Post deleted: {}", post);
        }
        Command::Publish { id } => {
            let post = client.publish_post(id).await?;
            println!("Post published: {}", post);
        }
        Command::Unpublish { id } => {
            let post = client.unpublish_post(id).await?;
            println!("Post unpublished: {}", post);
        }
    }

    Ok(())
}
