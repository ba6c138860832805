//! Order Form Collection
//!
//! Two ways to fill the form: command-line flags for a single submission,
//! or an interactive prompt session that offers the same fields, options
//! and defaults.

use clap::Args;
use order_input::{
    parse_number, Brand, Category, Choice, Gender, PaymentMode, RawOrderInput, State,
    ValidationError, Validator,
};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Order fields as command-line flags; omitted fields take the form defaults
#[derive(Debug, Clone, Default, Args)]
pub struct OrderArgs {
    /// Customer age (18-99)
    #[arg(long)]
    pub age: Option<u32>,
    /// Female or Male
    #[arg(long)]
    pub gender: Option<Gender>,
    /// Quantity (0.0-10.0, step 0.1)
    #[arg(long)]
    pub quantity: Option<f64>,
    /// Unit price (>= 0)
    #[arg(long)]
    pub price: Option<f64>,
    /// Discount in percent (0-100)
    #[arg(long)]
    pub discount: Option<f64>,
    /// Product rating (0.0-5.0, step 0.5)
    #[arg(long)]
    pub rating: Option<f64>,
    /// Product category, e.g. "Ethnic Wear"
    #[arg(long)]
    pub category: Option<Category>,
    /// Brand, e.g. "Levie's"
    #[arg(long)]
    pub brand: Option<Brand>,
    /// "Cash on Delivery" or "Online Payment"
    #[arg(long)]
    pub payment_mode: Option<PaymentMode>,
    /// Shipping state, e.g. "Maharashtra"
    #[arg(long)]
    pub state: Option<String>,
}

impl OrderArgs {
    /// Fill the form from flags and validate it
    pub fn into_order(self, validator: &Validator) -> Result<RawOrderInput, ValidationError> {
        let defaults = RawOrderInput::default();
        let state = match self.state {
            Some(name) => {
                let state: State = name.parse()?;
                validator.regions().resolve(state.as_str())
            }
            None => defaults.state,
        };

        let order = RawOrderInput {
            age: self.age.unwrap_or(defaults.age),
            gender: self.gender.unwrap_or(defaults.gender),
            quantity: self.quantity.unwrap_or(defaults.quantity),
            price: self.price.unwrap_or(defaults.price),
            discount_pct: self.discount.unwrap_or(defaults.discount_pct),
            rating: self.rating.unwrap_or(defaults.rating),
            category: self.category.unwrap_or(defaults.category),
            brand: self.brand.unwrap_or(defaults.brand),
            payment_mode: self.payment_mode.unwrap_or(defaults.payment_mode),
            state,
        };

        validator.validate(&order).into_result()?;
        Ok(order)
    }
}

/// Prompt-driven form over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer the prompts go to
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Read one trimmed line; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer; an empty answer takes `default`
    fn ask<T, F>(&mut self, label: &str, default: &str, mut parse: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Result<T, ValidationError>,
    {
        loop {
            write!(self.output, "{label} [{default}]: ")?;
            self.output.flush()?;

            let answer = match self.read_line()? {
                Some(line) if line.is_empty() => default.to_string(),
                Some(line) => line,
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed before the form was complete",
                    ))
                }
            };

            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("Rejected answer for {}: {}", label, e);
                    writeln!(self.output, "  {e}")?;
                }
            }
        }
    }

    /// Ask for one option of a closed set, by number or by name
    fn ask_choice<T: Choice>(&mut self, label: &str, default: T) -> io::Result<T> {
        let names: Vec<&'static str> = T::ALL.iter().map(|option| option.label()).collect();
        self.list_options(&names)?;
        self.ask(label, default.label(), |answer| {
            pick_by_number(&names, answer)
                .map(|index| Ok(T::ALL[index]))
                .unwrap_or_else(|| T::parse_choice(answer))
        })
    }

    fn list_options(&mut self, names: &[&str]) -> io::Result<()> {
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, name)?;
        }
        Ok(())
    }

    /// Ask yes/no, defaulting to no
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;
        Ok(matches!(
            self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    /// Walk the whole form, re-asking each field until it validates
    pub fn collect_order(&mut self, validator: &Validator) -> io::Result<RawOrderInput> {
        let defaults = RawOrderInput::default();
        let (min_age, max_age) = validator.config().age_range;
        writeln!(self.output, "Customer & Product Details")?;

        let age = self.ask(
            &format!("Age ({min_age}-{max_age})"),
            &defaults.age.to_string(),
            |answer| {
                let age = parse_number::<u32>("age", answer)?;
                validator.validate_age(age).map(|_| age)
            },
        )?;
        let gender = self.ask_choice("Gender", defaults.gender)?;
        let quantity = self.ask("Quantity", &format!("{:.1}", defaults.quantity), |answer| {
            let quantity = parse_number::<f64>("quantity", answer)?;
            validator.validate_quantity(quantity).map(|_| quantity)
        })?;
        let price = self.ask("Price", &format!("{:.1}", defaults.price), |answer| {
            let price = parse_number::<f64>("price", answer)?;
            validator.validate_price(price)?;
            validator.validate_amounts(quantity, price, 0.0).map(|_| price)
        })?;
        let discount_pct = self.ask(
            "Discount (%)",
            &format!("{:.1}", defaults.discount_pct),
            |answer| {
                let discount = parse_number::<f64>("discount", answer)?;
                validator.validate_discount(discount)?;
                validator
                    .validate_amounts(quantity, price, discount)
                    .map(|_| discount)
            },
        )?;
        let rating = self.ask(
            "Product Rating",
            &format!("{:.1}", defaults.rating),
            |answer| {
                let rating = parse_number::<f64>("rating", answer)?;
                validator.validate_rating(rating).map(|_| rating)
            },
        )?;

        let derived = feature_engine::compute_derived(quantity, price, discount_pct);
        writeln!(self.output, "Auto-calculated values")?;
        writeln!(self.output, "  Total Amount: {:.2}", derived.total_amount)?;
        writeln!(self.output, "  Effective Price: {:.2}", derived.effective_price)?;

        let category = self.ask_choice("Product Category", defaults.category)?;
        let brand = self.ask_choice("Brand", defaults.brand)?;
        let payment_mode = self.ask_choice("Payment Mode", defaults.payment_mode)?;

        let states = validator.regions().states();
        self.list_options(&states)?;
        let state = self.ask("State", defaults.state.as_str(), |answer| {
            let state = match pick_by_number(&states, answer) {
                Some(index) => State::new(states[index]),
                None => {
                    let typed: State = answer.parse()?;
                    validator.regions().resolve(typed.as_str())
                }
            };
            validator.validate_state(state.as_str()).map(|_| state)
        })?;

        Ok(RawOrderInput {
            age,
            gender,
            quantity,
            price,
            discount_pct,
            rating,
            category,
            brand,
            payment_mode,
            state,
        })
    }
}

/// 1-based option number typed by the user
fn pick_by_number(names: &[&str], answer: &str) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=names.len()).contains(n))
        .map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_input::{RegionTable, ValidationConfig};

    fn run_form(script: &str) -> (io::Result<RawOrderInput>, String) {
        let validator = Validator::default();
        let mut output = Vec::new();
        let result = {
            let mut prompter = Prompter::new(script.as_bytes(), &mut output);
            prompter.collect_order(&validator)
        };
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_all_defaults() {
        let (order, transcript) = run_form("\n\n\n\n\n\n\n\n\n\n");
        assert_eq!(order.unwrap(), RawOrderInput::default());
        assert!(transcript.contains("Total Amount: 500.00"));
        assert!(transcript.contains("Effective Price: 500.00"));
    }

    #[test]
    fn test_typed_answers_and_numbers() {
        // age, gender, qty, price, discount, rating, category, brand, payment, state
        let script = "45\nmale\n2\n250\n20\n4.5\njeans\n2\n2\nmaharashtra\n";
        let (order, transcript) = run_form(script);
        let order = order.unwrap();
        assert_eq!(order.age, 45);
        assert_eq!(order.gender, Gender::Male);
        assert_eq!(order.quantity, 2.0);
        assert_eq!(order.rating, 4.5);
        assert_eq!(order.category, Category::Jeans);
        assert_eq!(order.brand, Brand::Levies);
        assert_eq!(order.payment_mode, PaymentMode::OnlinePayment);
        assert_eq!(order.state.as_str(), "Maharashtra");
        assert!(transcript.contains("Effective Price: 400.00"));
    }

    #[test]
    fn test_invalid_answer_is_asked_again() {
        let script = "12\nabc\n30\n\n\n\n\n3.7\n\n\n\n\n\n";
        let (order, transcript) = run_form(script);
        let order = order.unwrap();
        assert_eq!(order.age, 30);
        assert_eq!(order.rating, 3.5);
        assert!(transcript.contains("age value 12 is out of range"));
        assert!(transcript.contains("Invalid age"));
        assert!(transcript.contains("rating value 3.7 is not a multiple of 0.5"));
    }

    #[test]
    fn test_overflowing_price_is_asked_again() {
        // age, gender, qty 10, price 1e308 (rejected), price 100, then defaults
        let script = "\n\n10\n1e308\n100\n100\n\n\n\n\n\n";
        let (order, transcript) = run_form(script);
        let order = order.unwrap();
        assert_eq!(order.price, 100.0);
        assert_eq!(order.discount_pct, 100.0);
        assert!(transcript.contains("total amount value inf is out of range"));
        assert!(transcript.contains("Effective Price: 0.00"));
    }

    #[test]
    fn test_eof_aborts() {
        let (order, _) = run_form("30\n");
        assert_eq!(order.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_args_fill_defaults() {
        let args = OrderArgs {
            quantity: Some(2.0),
            price: Some(250.0),
            discount: Some(20.0),
            state: Some("west bengal".to_string()),
            ..Default::default()
        };
        let order = args.into_order(&Validator::default()).unwrap();
        assert_eq!(order.age, 30);
        assert_eq!(order.discount_pct, 20.0);
        assert_eq!(order.state.as_str(), "West Bengal");
    }

    #[test]
    fn test_args_reject_unlisted_state_by_default() {
        let args = OrderArgs {
            state: Some("Andhra Pradesh".to_string()),
            ..Default::default()
        };
        assert_eq!(
            args.clone().into_order(&Validator::default()).unwrap_err(),
            ValidationError::UnlistedState("Andhra Pradesh".to_string())
        );

        let lenient = Validator::new(
            ValidationConfig {
                allow_unlisted_states: true,
                ..Default::default()
            },
            RegionTable::standard(),
        );
        assert_eq!(
            args.into_order(&lenient).unwrap().state.as_str(),
            "Andhra Pradesh"
        );
    }

    #[test]
    fn test_pick_by_number() {
        let names = ["a", "b", "c"];
        assert_eq!(pick_by_number(&names, "1"), Some(0));
        assert_eq!(pick_by_number(&names, "3"), Some(2));
        assert_eq!(pick_by_number(&names, "0"), None);
        assert_eq!(pick_by_number(&names, "4"), None);
        assert_eq!(pick_by_number(&names, "b"), None);
    }
}
