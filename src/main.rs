//! Pharmacy Portal - command-line client for the franchise ordering backend

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pharmacy_portal::api::{
    AiApi, AiClient, Attachment, AuthApi, BalanceTxParams, BranchOrderApi, ChatKind, ChatRequest, NoticeApi,
    NoticeDraft, NoticeType, OrderManagementApi, PharmacyApi, PharmacyListParams, PharmacyRequestApi,
    PharmacyRequestParams, PharmacyRequestStatus, ProductApi, ProductListParams, StockApi, StockInRequest, SummaryApi,
    SummaryKind,
};
use pharmacy_portal::domain::aggregates::order::{OrderListParams, OrderStatus};
use pharmacy_portal::domain::aggregates::profile::AuthState;
use pharmacy_portal::domain::value_objects::{format_contact, OrderId, PharmacyId, PharmacyRequestId, ProductId};
use pharmacy_portal::validation::LoginRequest;
use pharmacy_portal::{
    CartLineItem, HttpPortalClient, JsonFilePersistence, PortalConfig, PortalError, ReturnLineItem, Session,
    SubmissionFlow, Won,
};

#[derive(Parser)]
#[command(name = "pharmacy-portal", about = "Branch ordering and HQ management client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Sign in as HQ staff
        #[arg(long)]
        admin: bool,
    },
    /// Sign out and drop the local session and carts
    Logout,
    #[command(subcommand)]
    Cart(CartCommand),
    #[command(subcommand)]
    Order(OrderCommand),
    #[command(subcommand)]
    Return(ReturnCommand),
    /// Show the branch's credit usage
    Credit,
    /// Edit the signed-in branch or HQ profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        representative: Option<String>,
        #[arg(long)]
        postcode: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        detail_address: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        /// HQ accounts only
        #[arg(long)]
        department: Option<String>,
    },
    /// Latest notices
    Notices,
    #[command(subcommand)]
    Hq(HqCommand),
    /// Upload a sales CSV and print suggested order quantities
    Forecast { file: PathBuf },
    /// Ask the FAQ or QnA chatbot
    Chat {
        #[arg(long, value_enum, default_value_t = ChatMode::Faq)]
        mode: ChatMode,
        question: String,
    },
    /// Summarize a notice attachment
    Summarize {
        #[arg(long, value_enum)]
        kind: DocumentKind,
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    Add {
        #[arg(long)]
        product_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        manufacturer: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        price: i64,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    Remove {
        #[arg(long)]
        product_id: i64,
    },
    Set {
        #[arg(long)]
        product_id: i64,
        #[arg(long)]
        qty: u32,
    },
    Show,
    Clear,
}

#[derive(Subcommand)]
enum OrderCommand {
    /// Submit the order cart
    Submit,
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// List every branch's orders (HQ)
        #[arg(long)]
        all: bool,
    },
    Show { order_id: i64 },
    Approve { order_id: i64 },
    Reject { order_id: i64 },
}

#[derive(Subcommand)]
enum ReturnCommand {
    /// Request a return for lines of a past order
    Submit {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        reason: String,
        /// `productId:quantity:unitPrice`, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<ReturnItemArg>,
    },
}

#[derive(Subcommand)]
enum HqCommand {
    /// Search the product catalogue
    Products {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Book incoming stock for a product
    StockIn {
        #[arg(long)]
        product_id: i64,
        #[arg(long)]
        amount: u32,
    },
    /// Post a notice, optionally with an attachment
    Notice {
        #[arg(long, value_enum, default_value_t = NoticeKind::General)]
        kind: NoticeKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List branches and their outstanding balance
    Pharmacies {
        #[arg(long)]
        unsettled: bool,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Settle a branch's outstanding balance
    Settle { pharmacy_id: i64 },
    /// Balance ledger of one branch
    Ledger { pharmacy_id: i64 },
    /// Pending branch registration requests
    Requests,
    ApproveRequest { request_id: i64 },
    RejectRequest { request_id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum NoticeKind {
    General,
    Law,
    Epidemic,
    NewProduct,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChatMode {
    Faq,
    Qna,
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentKind {
    Law,
    Epidemic,
    NewProduct,
}

#[derive(Clone, Debug)]
struct ReturnItemArg {
    product_id: i64,
    quantity: u32,
    unit_price: i64,
}

impl FromStr for ReturnItemArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [id, qty, price] = parts.as_slice() else {
            return Err(format!("expected productId:quantity:unitPrice, got {s:?}"));
        };
        let bad = |field: &str| format!("invalid {field} in {s:?}");
        Ok(Self {
            product_id: id.parse().map_err(|_| bad("productId"))?,
            quantity: qty.parse().map_err(|_| bad("quantity"))?,
            unit_price: price.parse().map_err(|_| bad("unitPrice"))?,
        })
    }
}

fn load_auth(path: &Path) -> Result<AuthState> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).with_context(|| format!("reading {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AuthState::new()),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

fn save_auth(path: &Path, auth: &AuthState) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(auth)?).with_context(|| format!("writing {}", path.display()))
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned();
    let contents = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Attachment::new(name, contents))
}

async fn run_hq(client: &HttpPortalClient, command: HqCommand) -> Result<()> {
    match command {
        HqCommand::Products { keyword, page } => {
            let result = client.list_products(&ProductListParams { keyword, page, ..Default::default() }).await?;
            for p in &result.items {
                println!("{:>6}  {:<24} {:<16} {:>10} {:>6}", p.product_id, p.product_name, p.manufacturer, p.unit_price, p.stock_qty);
            }
            println!("page {}/{} ({} products)", result.info.current_page + 1, result.info.total_pages.max(1), result.info.total_elements);
        }
        HqCommand::StockIn { product_id, amount } => {
            let booked = client.stock_in(&StockInRequest { product_id: ProductId(product_id), amount }).await?;
            println!("stock {} -> {}", booked.quantity_before, booked.quantity_after);
        }
        HqCommand::Notice { kind, title, content, file } => {
            let kind = match kind {
                NoticeKind::General => NoticeType::General,
                NoticeKind::Law => NoticeType::Law,
                NoticeKind::Epidemic => NoticeType::Epidemic,
                NoticeKind::NewProduct => NoticeType::NewProduct,
            };
            let attachment = file.as_deref().map(read_attachment).transpose()?;
            let created = client.create_notice(&NoticeDraft { kind, title, content }, attachment.as_ref()).await?;
            println!("notice {} posted", created.notice_id);
        }
        HqCommand::Pharmacies { unsettled, keyword } => {
            let params = PharmacyListParams { unsettled: unsettled.then_some(true), keyword, ..Default::default() };
            for p in client.list_pharmacies(&params).await?.items {
                println!("{:>6}  {:<24} {:<8} {:>12}", p.pharmacy_id, p.pharmacy_name, p.region, p.outstanding_balance);
            }
        }
        HqCommand::Settle { pharmacy_id } => {
            let settled = client.settle_pharmacy(PharmacyId(pharmacy_id)).await?;
            println!("settled {} ({} -> {})", settled.amount, settled.balance_before, settled.balance_after);
        }
        HqCommand::Ledger { pharmacy_id } => {
            for tx in client.list_balance_txs(&BalanceTxParams::for_pharmacy(PharmacyId(pharmacy_id))).await?.items {
                println!("{}  {:<8} {:>12} {:>12}", tx.created_at, tx.kind.label(), tx.amount, tx.balance_after);
            }
        }
        HqCommand::Requests => {
            let params = PharmacyRequestParams { status: Some(PharmacyRequestStatus::Pending), ..Default::default() };
            for r in client.list_pharmacy_requests(&params).await?.items {
                println!("{:>6}  {:<24} {:<14} {}", r.pharmacy_request_id, r.pharmacy_name, r.biz_reg_no, r.requested_at);
            }
        }
        HqCommand::ApproveRequest { request_id } => {
            client.approve_pharmacy_request(PharmacyRequestId(request_id)).await?;
            println!("request {request_id} approved");
        }
        HqCommand::RejectRequest { request_id } => {
            client.reject_pharmacy_request(PharmacyRequestId(request_id)).await?;
            println!("request {request_id} rejected");
        }
    }
    Ok(())
}

fn print_cart(session: &Session) {
    for line in session.order_cart.items() {
        println!("{:>6}  {:<24} {:>4} x {:>10} = {}", line.product_id, line.product_name, line.quantity, line.unit_price, line.unit_price.times(line.quantity));
    }
    println!("total: {}", session.order_cart.total_price());
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::from_env()?;
    let session_path = config.session_path();

    let persistence = Arc::new(JsonFilePersistence::<CartLineItem>::new(config.order_cart_path()));
    let mut session = Session::with_order_persistence(persistence).with_credit_limit(config.credit_limit);
    session.auth = load_auth(&session_path)?;

    let client = HttpPortalClient::new(&config.api_base_url, config.timeout)?;
    client.set_access_token(session.auth.access_token().map(str::to_owned)).await;

    match cli.command {
        Command::Login { email, password, admin } => {
            let request = LoginRequest { email, password };
            let login = if admin { client.admin_login(&request).await? } else { client.branch_login(&request).await? };
            println!("signed in as {}", login.user.email);
            session.login(login);
        }
        Command::Logout => {
            if let Err(e) = client.logout().await {
                tracing::warn!(error = %e, "server logout failed");
            }
            session.logout();
            if session_path.exists() {
                std::fs::remove_file(&session_path)?;
            }
            println!("signed out");
            return Ok(());
        }
        Command::Cart(command) => match command {
            CartCommand::Add { product_id, name, manufacturer, code, price, qty } => {
                let mut line = CartLineItem::new(ProductId(product_id), name, manufacturer, Won(price), qty);
                if let Some(code) = code {
                    line = line.with_code(code);
                }
                session.order_cart.add_item(line);
                print_cart(&session);
            }
            CartCommand::Remove { product_id } => {
                session.order_cart.remove_item(ProductId(product_id));
                print_cart(&session);
            }
            CartCommand::Set { product_id, qty } => {
                session.order_cart.update_quantity(ProductId(product_id), qty);
                print_cart(&session);
            }
            CartCommand::Show => print_cart(&session),
            CartCommand::Clear => {
                session.order_cart.clear();
                println!("cart cleared");
            }
        },
        Command::Order(command) => match command {
            OrderCommand::Submit => {
                let flow = SubmissionFlow::new(client.clone());
                match flow.submit_order(&mut session).await {
                    Ok(receipt) => println!("{} (order {}, balance {})", receipt.message(), receipt.order_id, receipt.outstanding_balance),
                    Err(e) => {
                        tracing::debug!(error = %e, "order not submitted");
                        eprintln!("{}", e.user_message());
                    }
                }
            }
            OrderCommand::List { status, page, size, all } => {
                let status = status
                    .map(|s| serde_json::from_value::<OrderStatus>(serde_json::Value::String(s.to_uppercase())))
                    .transpose()
                    .context("unknown order status")?;
                let mut params = OrderListParams { pharmacy_id: None, status, page, size };
                let result = if all {
                    client.list_admin_orders(&params).await?
                } else {
                    params.pharmacy_id = session.auth.pharmacy_id();
                    client.list_branch_orders(&params).await?
                };
                for order in &result.items {
                    let marker = if order.status.is_pending() { '*' } else { ' ' };
                    println!("{marker}{:>6}  {:<10} {:>12}  {}", order.order_id, order.status.label(), order.total_price, order.created_at);
                }
                println!("page {}/{} ({} orders)", result.info.current_page + 1, result.info.total_pages.max(1), result.info.total_elements);
            }
            OrderCommand::Show { order_id } => {
                let detail = client.get_order(OrderId(order_id)).await?;
                println!("{}", serde_json::to_string_pretty(&detail)?);
            }
            OrderCommand::Approve { order_id } => {
                client.approve_order(OrderId(order_id)).await?;
                println!("order {order_id} approved");
            }
            OrderCommand::Reject { order_id } => {
                client.reject_order(OrderId(order_id)).await?;
                println!("order {order_id} rejected");
            }
        },
        Command::Return(ReturnCommand::Submit { order_id, reason, items }) => {
            session.return_cart.add_items(
                items.into_iter().map(|i| ReturnLineItem::new(ProductId(i.product_id), "", "", Won(i.unit_price), i.quantity)),
            );
            let flow = SubmissionFlow::new(client.clone());
            match flow.submit_return(&mut session, OrderId(order_id), &reason).await {
                Ok(receipt) => println!("{} (return {})", receipt.message(), receipt.return_id),
                Err(e) => eprintln!("{}", e.user_message()),
            }
        }
        Command::Credit => {
            let position = session.credit_position().ok_or(PortalError::NotSignedIn)?;
            let info = position.info();
            println!("used      {} ({}%)", info.used_amount, info.usage_percent);
            println!("remaining {} ({}%)", info.remaining_amount, info.remaining_percent);
            println!("limit     {}", info.total_limit);
            println!("tier      {:?} {}", info.tier, info.tier.color());
        }
        Command::Profile { name, representative, postcode, address, detail_address, contact, department } => {
            if let Ok(mut form) = session.admin_profile_form() {
                form.admin_name = name.unwrap_or(form.admin_name);
                form.department = department.unwrap_or(form.department);
                let saved = session.save_admin_profile(&client, &form).await?;
                println!("{} ({})", saved.admin_name, saved.department);
            } else {
                let mut form = session.branch_profile_form()?;
                form.pharmacy_name = name.unwrap_or(form.pharmacy_name);
                form.representative_name = representative.unwrap_or(form.representative_name);
                form.postcode = postcode.unwrap_or(form.postcode);
                form.address = address.unwrap_or(form.address);
                form.detail_address = detail_address.unwrap_or(form.detail_address);
                form.contact = contact.map_or(form.contact, |c| format_contact(&c));
                let saved = session.save_branch_profile(&client, &form).await?;
                println!("{} / {} / {}", saved.pharmacy_name, saved.representative_name, saved.contact);
            }
        }
        Command::Notices => {
            for n in client.latest_notices().await?.items {
                println!("{:>6}  [{}] {}  {}", n.notice_id, n.kind.label(), n.title, n.created_at.date());
            }
        }
        Command::Hq(command) => run_hq(&client, command).await?,
        Command::Forecast { file } => {
            let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned();
            let csv = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            for row in client.forecast_order(&name, csv).await? {
                println!("{:<12} {:<32} {}", row.product_code, row.product_name, row.predicted_quantity);
            }
        }
        Command::Chat { mode, question } => {
            let kind = match mode {
                ChatMode::Faq => ChatKind::Faq,
                ChatMode::Qna => ChatKind::Qna,
            };
            let request = ChatRequest { user_id: session.auth.user().map(|u| u.user_id), kind, question, history: vec![] };
            println!("{}", client.chat(&request).await?.answer);
        }
        Command::Summarize { kind, file } => {
            let kind = match kind {
                DocumentKind::Law => SummaryKind::Law,
                DocumentKind::Epidemic => SummaryKind::Epidemic,
                DocumentKind::NewProduct => SummaryKind::NewProduct,
            };
            let ai = AiClient::new(&config.ai_api_base_url, config.ai_timeout, client.shared_token())?;
            let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned();
            let contents = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let summary = ai.summarize(kind, &name, contents).await?;
            println!("{}", summary.summary);
            if let Some(notice) = summary.notice {
                println!("\n{notice}");
            }
        }
    }

    match client.access_token().await {
        Some(token) => session.auth.set_access_token(token),
        None if session.auth.is_authenticated() => session.auth.clear(),
        None => {}
    }
    save_auth(&session_path, &session.auth)
}
