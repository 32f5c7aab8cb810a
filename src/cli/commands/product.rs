//! `seamline product` command - catalogue, SKU, and image-record management

use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};
use serde_json::json;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{open_store, request_context, require_role, truncate_str};
use crate::cli::table;
use crate::core::audit;
use crate::core::store::{format_timestamp, ProductFilter};
use crate::entities::{ActivityAction, Role};

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// Register a product with its color/size SKUs
    New(NewArgs),

    /// Register an extra SKU on an existing product
    Sku(SkuArgs),

    /// List the catalogue (operators see their own brand)
    List(ListArgs),

    /// Show a product with its SKUs and images
    Show(ShowArgs),

    /// Update a product's fields
    Update(UpdateArgs),

    /// Delete a product and its SKUs
    Delete(DeleteArgs),

    /// Text search by name or barcode
    Search(SearchArgs),

    /// Image-record management
    #[command(subcommand)]
    Image(ImageCommands),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    pub name: String,

    /// Vendor name
    #[arg(long)]
    pub vendor: Option<String>,

    /// Brand the product belongs to
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Storage location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Color option (repeatable)
    #[arg(long, short = 'c')]
    pub color: Vec<String>,

    /// Size option (repeatable)
    #[arg(long, short = 's')]
    pub size: Vec<String>,

    /// Barcode per color/size combination, in color-major order (repeatable)
    #[arg(long, short = 'B')]
    pub barcode: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SkuArgs {
    /// Product id
    pub product: i64,

    /// Barcode, unique across the catalogue
    #[arg(long, short = 'B')]
    pub barcode: String,

    /// Color of this SKU
    #[arg(long, short = 'c')]
    pub color: String,

    /// Size of this SKU
    #[arg(long, short = 's')]
    pub size: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by brand (ignored for operators, who always see their own)
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Filter by vendor
    #[arg(long)]
    pub vendor: Option<String>,

    /// Keyword across name, options, barcode, location, and id
    #[arg(long, short = 'k')]
    pub keyword: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product id
    pub product: i64,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Product id
    pub product: i64,

    /// New product name
    #[arg(long)]
    pub name: Option<String>,

    /// New vendor
    #[arg(long)]
    pub vendor: Option<String>,

    /// New brand
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// New storage location
    #[arg(long, short = 'l')]
    pub location: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product id
    pub product: i64,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text, matched against product names and barcodes
    pub query: String,
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// Record an image file against a product
    Add(ImageAddArgs),

    /// List a product's image records
    List(ImageListArgs),

    /// Mark an image as the main one
    Main(ImageMainArgs),

    /// Remove an image record
    Rm(ImageRmArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImageAddArgs {
    /// Product id
    pub product: i64,

    /// Stored file name
    pub file_name: String,

    /// Mark as the main image
    #[arg(long, short = 'm')]
    pub main: bool,
}

#[derive(clap::Args, Debug)]
pub struct ImageListArgs {
    /// Product id
    pub product: i64,
}

#[derive(clap::Args, Debug)]
pub struct ImageMainArgs {
    /// Image id
    pub image: i64,
}

#[derive(clap::Args, Debug)]
pub struct ImageRmArgs {
    /// Image id
    pub image: i64,
}

pub fn run(cmd: ProductCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProductCommands::New(args) => run_new(args, global),
        ProductCommands::Sku(args) => run_sku(args, global),
        ProductCommands::List(args) => run_list(args, global),
        ProductCommands::Show(args) => run_show(args, global),
        ProductCommands::Update(args) => run_update(args, global),
        ProductCommands::Delete(args) => run_delete(args, global),
        ProductCommands::Search(args) => run_search(args, global),
        ProductCommands::Image(cmd) => run_image(cmd, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator])?;

    if !args.color.is_empty() || !args.size.is_empty() {
        let combos = args.color.len() * args.size.len();
        if combos == 0 {
            return Err(miette!(
                "give at least one --color and one --size, or neither"
            ));
        }
        if args.barcode.len() != combos {
            return Err(miette!(
                "{} color/size combinations need {} barcodes, got {}",
                combos,
                combos,
                args.barcode.len()
            ));
        }
    } else if !args.barcode.is_empty() {
        return Err(miette!("--barcode requires --color and --size options"));
    }

    let product_id = store
        .insert_product(
            &args.name,
            args.vendor.as_deref(),
            args.brand.as_deref(),
            args.location.as_deref(),
            ctx.now,
        )
        .into_diagnostic()?;

    let mut sku_count = 0usize;
    let mut barcodes = args.barcode.iter();
    for color in &args.color {
        for size in &args.size {
            // combos == barcode count was checked up front
            if let Some(barcode) = barcodes.next() {
                let inserted = store
                    .insert_sku(product_id, barcode, color, size, ctx.now)
                    .into_diagnostic()?;
                if inserted.is_some() {
                    sku_count += 1;
                } else if !global.quiet {
                    println!(
                        "{} barcode {} already registered, skipped",
                        style("!").yellow(),
                        barcode
                    );
                }
            }
        }
    }

    audit::record(
        &mut store,
        &ctx,
        ActivityAction::Create,
        "products",
        product_id,
        &json!({}),
        &json!({ "product_name": args.name, "brand": args.brand, "skus": sku_count }),
    );

    if !global.quiet {
        println!(
            "{} Registered product '{}' (id {}) with {} SKUs",
            style("✓").green(),
            args.name,
            product_id,
            sku_count
        );
    }
    Ok(())
}

fn run_sku(args: SkuArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator])?;

    if store.product_by_id(args.product).into_diagnostic()?.is_none() {
        return Err(miette!("product {} not found", args.product));
    }
    let inserted = store
        .insert_sku(args.product, &args.barcode, &args.color, &args.size, ctx.now)
        .into_diagnostic()?;

    match inserted {
        Some(id) => {
            if !global.quiet {
                println!(
                    "{} Registered SKU {}/{} barcode {} (id {})",
                    style("✓").green(),
                    args.color,
                    args.size,
                    args.barcode,
                    id
                );
            }
            Ok(())
        }
        None => Err(miette!("barcode {} is already registered", args.barcode)),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator, Role::Inspector])?;

    // Operators only ever see their own brand's products
    let brand = if ctx.role == Role::Operator {
        store
            .user_by_id(ctx.actor)
            .into_diagnostic()?
            .and_then(|u| u.brand)
    } else {
        args.brand
    };

    let filter = ProductFilter {
        brand,
        vendor: args.vendor,
        keyword: args.keyword,
    };
    let listings = store.list_products(&filter).into_diagnostic()?;

    let rows: Vec<Vec<String>> = listings
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.product_name.clone(),
                truncate_str(&p.options, 40),
                truncate_str(&p.barcodes, 40),
                p.location.clone().unwrap_or_else(|| "-".to_string()),
                p.brand.clone().unwrap_or_else(|| "-".to_string()),
                format_timestamp(&p.created_at),
            ]
        })
        .collect();

    table::print_rows(
        global.format,
        &["ID", "Name", "Options", "Barcodes", "Location", "Brand", "Created"],
        &rows,
        &listings,
    )?;
    if !global.quiet && global.format == crate::cli::args::OutputFormat::Table {
        println!("\n{} products", listings.len());
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator, Role::Inspector])?;

    let Some(product) = store.product_by_id(args.product).into_diagnostic()? else {
        return Err(miette!("product {} not found", args.product));
    };
    let skus = store.skus_for_product(product.id).into_diagnostic()?;
    let images = store.images_for_product(product.id).into_diagnostic()?;

    println!("{} {}", style("Product:").bold(), product.product_name);
    println!("  id:       {}", product.id);
    println!(
        "  vendor:   {}",
        product.vendor.as_deref().unwrap_or("-")
    );
    println!("  brand:    {}", product.brand.as_deref().unwrap_or("-"));
    println!(
        "  location: {}",
        product.location.as_deref().unwrap_or("-")
    );
    println!("  created:  {}", format_timestamp(&product.created_at));

    if skus.is_empty() {
        println!("\n{}", style("No SKUs registered").dim());
    } else {
        let rows: Vec<Vec<String>> = skus
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.barcode.clone(),
                    s.color.clone(),
                    s.size.clone(),
                ]
            })
            .collect();
        println!();
        println!("{}", table::render_table(&["ID", "Barcode", "Color", "Size"], &rows));
    }

    if !images.is_empty() {
        let rows: Vec<Vec<String>> = images
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.file_name.clone(),
                    if i.is_main { "main".to_string() } else { String::new() },
                ]
            })
            .collect();
        println!();
        println!("{}", table::render_table(&["ID", "File", ""], &rows));
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator])?;

    let Some(before) = store.product_by_id(args.product).into_diagnostic()? else {
        return Err(miette!("product {} not found", args.product));
    };

    let name = args.name.unwrap_or_else(|| before.product_name.clone());
    let vendor = args.vendor.or_else(|| before.vendor.clone());
    let brand = args.brand.or_else(|| before.brand.clone());
    let location = args.location.or_else(|| before.location.clone());

    store
        .update_product(
            args.product,
            &name,
            vendor.as_deref(),
            brand.as_deref(),
            location.as_deref(),
        )
        .into_diagnostic()?;

    audit::record(
        &mut store,
        &ctx,
        ActivityAction::Update,
        "products",
        args.product,
        &json!({
            "product_name": before.product_name, "vendor": before.vendor,
            "brand": before.brand, "location": before.location,
        }),
        &json!({
            "product_name": name, "vendor": vendor,
            "brand": brand, "location": location,
        }),
    );

    if !global.quiet {
        println!("{} Updated product {}", style("✓").green(), args.product);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator])?;

    let Some(before) = store.product_by_id(args.product).into_diagnostic()? else {
        return Err(miette!("product {} not found", args.product));
    };
    store.delete_product(args.product).into_diagnostic()?;

    audit::record(
        &mut store,
        &ctx,
        ActivityAction::Delete,
        "products",
        args.product,
        &json!({ "product_name": before.product_name }),
        &json!({}),
    );

    if !global.quiet {
        println!(
            "{} Deleted product '{}' and its SKUs",
            style("✓").green(),
            before.product_name
        );
    }
    Ok(())
}

fn run_search(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator, Role::Inspector, Role::Worker])?;

    let hits = store.search_products(&args.query).into_diagnostic()?;
    let rows: Vec<Vec<String>> = hits
        .iter()
        .map(|h| {
            vec![
                h.id.to_string(),
                h.product_name.clone(),
                h.barcode.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    table::print_rows(global.format, &["ID", "Name", "Barcode"], &rows, &hits)
}

fn run_image(cmd: ImageCommands, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    let ctx = request_context(&store, global)?;
    require_role(&ctx, &[Role::Operator])?;

    match cmd {
        ImageCommands::Add(args) => {
            if store.product_by_id(args.product).into_diagnostic()?.is_none() {
                return Err(miette!("product {} not found", args.product));
            }
            let id = store
                .add_image(args.product, &args.file_name, args.main, ctx.now)
                .into_diagnostic()?;
            if !global.quiet {
                println!("{} Recorded image '{}' (id {})", style("✓").green(), args.file_name, id);
            }
            Ok(())
        }
        ImageCommands::List(args) => {
            let images = store.images_for_product(args.product).into_diagnostic()?;
            let rows: Vec<Vec<String>> = images
                .iter()
                .map(|i| {
                    vec![
                        i.id.to_string(),
                        i.file_name.clone(),
                        if i.is_main { "main".to_string() } else { String::new() },
                        format_timestamp(&i.uploaded_at),
                    ]
                })
                .collect();
            table::print_rows(
                global.format,
                &["ID", "File", "Main", "Uploaded"],
                &rows,
                &images,
            )
        }
        ImageCommands::Main(args) => {
            store.set_main_image(args.image).into_diagnostic()?;
            if !global.quiet {
                println!("{} Image {} is now the main image", style("✓").green(), args.image);
            }
            Ok(())
        }
        ImageCommands::Rm(args) => {
            store.delete_image(args.image).into_diagnostic()?;
            if !global.quiet {
                println!("{} Removed image record {}", style("✓").green(), args.image);
            }
            Ok(())
        }
    }
}
