//! Built-in explanations shown when hovering over well-known output.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::TextStyle;

fn rounding_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"\.000000000000[0-9]+$",
            r"\.999999999999[0-9]+$",
            r"\.000000000000[0-9]+e",
            r"\.999999999999[0-9]+e",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// True if a displayed number looks like a floating-point rounding artefact.
pub fn looks_like_rounding_error(number: &str) -> bool {
    rounding_patterns().iter().any(|re| re.is_match(number))
}

pub const ROUNDING_ERROR: &str = "As calculating 0.1^12 demonstrates maxima by default doesn't tend to \
hide what looks like being the small error using floating-point numbers introduces.\n\
If this seems to be the case here the error can be avoided by using exact numbers like 1/10, \
1*10^-1 or rat(.1).\n\
It also can be hidden by setting fpprintprec to an appropriate value. \
But be aware in this case that even small errors can add up.";

fn is_digits_suffix(text: &str, prefix: &str) -> bool {
    text.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Tooltip for a freshly set value, if one applies.
///
/// `previous` is the plain-text form of the logically preceding cell; some
/// error messages are explained differently depending on the function that
/// raised them.
pub fn tooltip_for(text: &str, style: TextStyle, previous: Option<&str>) -> Option<&'static str> {
    match style {
        TextStyle::Function => {
            if text == "ilt" {
                return Some("The inverse laplace transform.");
            }
            None
        }
        TextStyle::Variable => variable_tooltip(text),
        TextStyle::Number => None,
        _ => message_tooltip(text, previous),
    }
}

fn variable_tooltip(text: &str) -> Option<&'static str> {
    let tip = match text {
        "pnz" => "Either positive, negative or zero.\n\
                  Normally the result of sign() if the sign cannot be determined.",
        "pz" => "Either positive or zero.\nA possible result of sign().",
        "nz" => "Either negative or zero.\nA possible result of sign().",
        "und" => "The result was undefined.",
        "ind" => "The result was indefinite.",
        "zeroa" => "Infinitesimal above zero.",
        "zerob" => "Infinitesimal below zero.",
        "inf" => "+\u{221E}.",
        "minf" => "-\u{221E}.",
        "infinity" => "Complex infinity.",
        _ if is_digits_suffix(text, "%r") => {
            "A variable that can be assigned a number to.\n\
             Often used by solve() and algsys(), if there is an infinite number of results."
        }
        _ if is_digits_suffix(text, "%i") => "An integration constant.",
        _ => return None,
    };
    Some(tip)
}

fn message_tooltip(text: &str, previous: Option<&str>) -> Option<&'static str> {
    let starts = |p: &str| text.starts_with(p);
    let has = |p: &str| text.contains(p);

    if has("LINE SEARCH FAILED. SEE")
        || has("DOCUMENTATION OF ROUTINE MCSRCH")
        || has("ERROR RETURN OF LINE SEARCH:")
        || has("POSSIBLE CAUSES: FUNCTION OR GRADIENT ARE INCORRECT")
    {
        return Some(
            "This message can appear when trying to numerically find an optimum. \
             In this case it might indicate that a starting point lies in a local optimum \
             that fits the data best if one parameter is increased to infinity or decreased \
             to -infinity. It also can indicate that an attempt was made to fit data to an \
             equation that actually matches the data best if one parameter is set to +/- infinity.",
        );
    }
    if starts("incorrect syntax") && has("is not an infix operator") {
        return Some(
            "A command or number wasn't preceded by a \":\", a \"$\", a \";\" or a \",\".\n\
             Most probable cause: A missing comma between two list items.",
        );
    }
    if starts("incorrect syntax") && has("Found LOGICAL expression where ALGEBRAIC expression expected") {
        return Some(
            "Most probable cause: A dot instead a comma between two list items containing assignments.",
        );
    }
    if starts("incorrect syntax") && has("is not a prefix operator") {
        return Some("Most probable cause: Two commas or similar separators in a row.");
    }
    if has("Illegal use of delimiter") {
        return Some("Most probable cause: an operator was directly followed by a closing parenthesis.");
    }
    if starts("part: fell off the end.") {
        return Some(
            "part() or the [] operator was used in order to extract the nth element \
             of something that was less than n elements long.",
        );
    }
    if starts("rest: fell off the end.") {
        return Some("rest() tried to drop more entries from a list than the list was long.");
    }
    if starts("assignment: cannot assign to") {
        return Some(
            "The value of few special variables is assigned by Maxima and cannot be changed \
             by the user. Also a few constructs aren't variable names and therefore cannot be \
             written to.",
        );
    }
    if starts("rat: replaced ") {
        return Some(
            "Normally computers use floating-point numbers that can be handled incredibly fast \
             while being accurate to dozens of digits. They will, though, introduce a small error \
             into some common numbers. For example 0.1 is represented as \
             3602879701896397/36028797018963968.\n\
             Some maxima commands therefore use rat() in order to automatically convert floats \
             to exact numbers (like 1/10 or sqrt(2)/2) where floating-point errors might add up.\n\n\
             This error message doesn't occur if exact numbers (1/10 instead of 0.1) are used.\n\
             The info that numbers have automatically been converted can be suppressed by \
             setting ratprint to false.",
        );
    }
    if starts("desolve: can't handle this case.") {
        return Some(
            "The list of time-dependent variables to solve to doesn't match the time-dependent \
             variables the list of dgls contains.",
        );
    }
    if starts("expt: undefined: 0 to a negative exponent.") {
        return Some("Division by 0.");
    }
    if starts("incorrect syntax: parser: incomplete number; missing exponent?") {
        return Some("Might also indicate a missing multiplication sign (\"*\").");
    }
    if has("arithmetic error DIVISION-BY-ZERO signalled") {
        return Some(
            "Besides a division by 0 the reason for this error message can be a calculation \
             that returns +/-infinity.",
        );
    }
    if has("isn't in the domain of") {
        return Some(
            "Most probable cause: A function was called with a parameter that causes it to \
             return infinity and/or -infinity.",
        );
    }
    if starts("Only symbols can be bound") {
        return Some(
            "This error message is most probably caused by a try to assign a value to a number \
             instead of a variable name.\n\
             One probable cause is using a variable that already has a numeric value as a loop counter.",
        );
    }
    if starts("append: operators of arguments must all be the same.") {
        return Some(
            "Most probably it was attempted to append something to a list that isn't a list.\n\
             Enclosing the new element for the list in brackets ([]) converts it to a list and \
             makes it appendable.",
        );
    }
    if has(": invalid index") {
        return Some(
            "The [] or the part() command tried to access a list or matrix element that doesn't exist.",
        );
    }
    if starts("apply: subscript must be an integer; found:") {
        return Some(
            "the [] operator tried to extract an element of a list, a matrix, an equation or an \
             array. But instead of an integer number something was used whose numerical value is \
             unknown or not an integer.\n\
             Floating-point numbers are bound to contain small rounding errors and therefore in \
             most cases don't work as an array index that needs to be an exact integer number.",
        );
    }
    if starts(": improper argument: ") {
        return Some(match previous {
            Some("at") => {
                "The second argument of at() isn't an equation or a list of equations. \
                 Most probably it was lacking an \"=\"."
            }
            Some("subst") => {
                "The first argument of subst() isn't an equation or a list of equations. \
                 Most probably it was lacking an \"=\"."
            }
            _ => {
                "The argument of a function was of the wrong type. Most probably an equation \
                 was expected but was lacking an \"=\"."
            }
        });
    }
    None
}
