use anyhow::Context;
use yomu_client::api::{
    AuthToken, CommentId, Credentials, NewComment, NewUser, PostId, SignupOutcome, UpdateComment,
};
use yomu_client::{ApiClient, DEFAULT_HOST};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base URL of the blog API
    #[structopt(short, long, default_value = DEFAULT_HOST)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Create an account
    Signup {
        #[structopt(long)]
        first_name: String,

        #[structopt(long)]
        last_name: String,

        #[structopt(long)]
        username: String,

        #[structopt(long)]
        email: String,

        #[structopt(long)]
        password: String,

        /// Must repeat --password exactly
        #[structopt(long)]
        password_confirmation: String,
    },

    /// Open a session and print the token, for use as YOMU_TOKEN
    Login {
        username: String,
        password: String,
    },

    /// List all posts
    Posts,

    /// Show one post
    Post {
        /// Post id
        post: String,
    },

    /// List the comments of a post
    Comments {
        /// Post id
        post: String,
    },

    /// Comment on a post
    AddComment {
        /// Post id
        post: String,

        /// Comment text
        text: String,
    },

    /// Rewrite the text of one of your comments
    EditComment {
        /// Post id
        post: String,

        /// Comment id
        comment: String,

        /// Replacement text
        text: String,
    },

    /// Delete one of your comments
    DeleteComment {
        /// Post id
        post: String,

        /// Comment id
        comment: String,
    },
}

fn token() -> anyhow::Result<AuthToken> {
    let token =
        std::env::var("YOMU_TOKEN").context("retrieving YOMU_TOKEN environment variable")?;
    Ok(AuthToken(token))
}

fn maybe_token() -> Option<AuthToken> {
    std::env::var("YOMU_TOKEN").ok().map(AuthToken)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = ApiClient::new(opt.host);

    match opt.cmd {
        Command::Signup {
            first_name,
            last_name,
            username,
            email,
            password,
            password_confirmation,
        } => {
            let outcome = client
                .signup(&NewUser {
                    first_name,
                    last_name,
                    username,
                    email,
                    password,
                    password_confirmation,
                })
                .await
                .context("signing up")?;
            match outcome {
                SignupOutcome::Created => println!("account created"),
                SignupOutcome::Rejected(issues) => {
                    for issue in &issues {
                        eprintln!("{}", issue.msg);
                    }
                    anyhow::bail!("signup was rejected");
                }
            }
        }
        Command::Login { username, password } => {
            let token = client
                .login(&Credentials { username, password })
                .await
                .context("logging in")?;
            println!("{}", token.0);
        }
        Command::Posts => {
            let posts = client
                .posts(maybe_token().as_ref())
                .await
                .context("fetching posts")?;
            println!("{}", serde_json::to_string_pretty(&posts)?);
        }
        Command::Post { post } => {
            let post = client
                .post(maybe_token().as_ref(), &PostId(post))
                .await
                .context("fetching post")?;
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        Command::Comments { post } => {
            let comments = client
                .comments(maybe_token().as_ref(), &PostId(post))
                .await
                .context("fetching comments")?;
            println!("{}", serde_json::to_string_pretty(&comments)?);
        }
        Command::AddComment { post, text } => {
            let comment = client
                .add_comment(
                    Some(&token()?),
                    &NewComment {
                        post: PostId(post),
                        text,
                    },
                )
                .await
                .context("adding comment")?;
            println!("{}", serde_json::to_string_pretty(&comment)?);
        }
        Command::EditComment {
            post,
            comment,
            text,
        } => {
            client
                .update_comment(
                    Some(&token()?),
                    &UpdateComment {
                        comment: CommentId(comment),
                        text,
                        post: PostId(post),
                    },
                )
                .await
                .context("editing comment")?;
        }
        Command::DeleteComment { post, comment } => {
            client
                .delete_comment(Some(&token()?), &PostId(post), &CommentId(comment))
                .await
                .context("deleting comment")?;
        }
    }

    Ok(())
}
