//! Named locators for the storefront under test.
//!
//! One place for every selector the page objects use, so a markup change
//! is a one-line fix. Navigation links that the site renders under an
//! overlay are forced.

use crate::locator::Locator;

/// Login form and header navigation
pub mod nav {
    use super::Locator;

    /// "Sign in" header link
    #[must_use]
    pub fn sign_in() -> Locator {
        Locator::test_id("nav-sign-in")
    }

    /// Home link
    #[must_use]
    pub fn home() -> Locator {
        Locator::test_id("nav-home")
    }

    /// Cart link (covered by the header overlay)
    #[must_use]
    pub fn cart() -> Locator {
        Locator::new("a[data-test='nav-cart']").with_force()
    }

    /// Account menu toggle (covered by the header overlay)
    #[must_use]
    pub fn menu() -> Locator {
        Locator::test_id("nav-menu").with_force()
    }

    /// "My favorites" entry of the account menu
    #[must_use]
    pub fn my_favorites() -> Locator {
        Locator::test_id("nav-my-favorites")
    }

    /// Categories dropdown
    #[must_use]
    pub fn categories() -> Locator {
        Locator::test_id("nav-categories")
    }

    /// Category entry inside the dropdown
    #[must_use]
    pub fn category(name: &str) -> Locator {
        Locator::new(".dropdown-menu a").with_text(name).first()
    }

    /// Brand logo, which leads back to the product grid
    #[must_use]
    pub fn logo() -> Locator {
        Locator::new(".st3").first().with_force()
    }
}

/// Login form
pub mod login {
    use super::Locator;

    /// Email input
    #[must_use]
    pub fn email() -> Locator {
        Locator::new("#email")
    }

    /// Password input
    #[must_use]
    pub fn password() -> Locator {
        Locator::new("#password")
    }

    /// Submit button
    #[must_use]
    pub fn submit() -> Locator {
        Locator::new(".btnSubmit")
    }
}

/// Product grid and product detail
pub mod product {
    use super::Locator;

    /// Every product card image in the grid
    #[must_use]
    pub fn cards() -> Locator {
        Locator::new(".card-img-top")
    }

    /// First product card
    #[must_use]
    pub fn first_card() -> Locator {
        cards().first()
    }

    /// Last product card
    #[must_use]
    pub fn last_card() -> Locator {
        cards().last()
    }

    /// Card body at `index`
    #[must_use]
    pub fn card_body(index: usize) -> Locator {
        Locator::new(".card-body").nth(index)
    }

    /// Product links inside the filtered grid
    #[must_use]
    pub fn filtered_links() -> Locator {
        Locator::new(".col-md-9 .container a")
    }

    /// Add-to-cart button on the detail page
    #[must_use]
    pub fn add_to_cart() -> Locator {
        Locator::new("#btn-add-to-cart")
    }

    /// Add-to-favorites button on the detail page
    #[must_use]
    pub fn add_to_favorites() -> Locator {
        Locator::new("#btn-add-to-favorites")
    }

    /// Category badge on the detail page
    #[must_use]
    pub fn category_badge() -> Locator {
        Locator::new("span[aria-label='category']")
    }

    /// Product name headings (grid and detail page)
    #[must_use]
    pub fn names() -> Locator {
        Locator::new("h5[data-test=product-name]")
    }
}

/// Category and brand filters in the sidebar
pub mod filter {
    use super::Locator;

    /// Checkbox inside the label containing `name`
    #[must_use]
    pub fn checkbox(name: &str) -> Locator {
        Locator::new("label input[type='checkbox']").with_text(name)
    }
}

/// Search form
pub mod search {
    use super::Locator;

    /// Query input
    #[must_use]
    pub fn query() -> Locator {
        Locator::new("input#search-query")
    }

    /// Submit button
    #[must_use]
    pub fn submit() -> Locator {
        Locator::new("button[data-test=search-submit]")
    }
}

/// Cart page
pub mod cart {
    use super::Locator;

    /// Quantity inputs, one per cart line
    #[must_use]
    pub fn quantity_inputs() -> Locator {
        Locator::new("input[data-test='product-quantity']")
    }

    /// Quantity input of line `index`
    #[must_use]
    pub fn quantity(index: usize) -> Locator {
        Locator::new(".quantity").nth(index)
    }

    /// Product name cells
    #[must_use]
    pub fn product_names() -> Locator {
        Locator::test_id("product-title")
    }

    /// Unit price cells
    #[must_use]
    pub fn prices() -> Locator {
        Locator::test_id("product-price")
    }

    /// Cart total cell
    #[must_use]
    pub fn total() -> Locator {
        Locator::test_id("cart-total")
    }
}

/// Favorites page
pub mod favorites {
    use super::Locator;

    /// Delete buttons, one per favorite
    #[must_use]
    pub fn delete_buttons() -> Locator {
        Locator::test_id("delete")
    }

    /// Product names of the listed favorites
    #[must_use]
    pub fn names() -> Locator {
        Locator::test_id("product-name")
    }
}

/// Checkout wizard
pub mod checkout {
    use super::Locator;

    /// "Proceed" button of wizard step `step` (1 to 3)
    #[must_use]
    pub fn proceed(step: u8) -> Locator {
        Locator::test_id(format!("proceed-{step}"))
    }

    /// Payment method dropdown
    #[must_use]
    pub fn payment_method() -> Locator {
        Locator::new("select#payment-method")
    }

    /// Final confirm button
    #[must_use]
    pub fn finish() -> Locator {
        Locator::test_id("finish")
    }

    /// Confirmation banner shown after a successful order
    #[must_use]
    pub fn confirmation() -> Locator {
        Locator::test_id("payment-success-message")
    }
}
