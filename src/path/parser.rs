use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{eof, map, value},
    error::context,
    multi::{many0, separated_list0},
    sequence::preceded,
};
use nom_language::error::VerboseError;

// "" - allowed - root pointer
// /foo/bar/baz - allowed - plain RFC 6901 pointer
// foo/bar - not allowed - missing leading '/'
// /foo//bar - allowed - empty segment in the middle (a literal "" key)
// /foo/a~1b - allowed - escaped '/' inside a token
// /foo/a~0b - allowed - escaped '~' inside a token
pub(crate) fn parse_pointer(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    context(
        "expected a JSON Pointer starting with '/' or empty input",
        alt((
            value(Vec::new(), eof),
            |i| preceded(char('/'), separated_list0(char('/'), parse_token)).parse(i),
        )),
    )
    .parse(input)
}

fn parse_token(input: &str) -> IResult<&str, String, VerboseError<&str>> {
    let token_char = alt((unescape_json_pointer, satisfy(|c| c != '/' && c != '~')));
    context(
        "pointer token",
        map(many0(token_char), |chars: Vec<char>| {
            chars.into_iter().collect::<String>()
        }),
    )
    .parse(input)
}

fn unescape_json_pointer(input: &str) -> IResult<&str, char, VerboseError<&str>> {
    let (rest, _) = char('~').parse(input)?;
    let (rest, esc) = alt((char('0'), char('1'))).parse(rest)?;

    let decoded_char = match esc {
        '0' => '~',
        '1' => '/',
        _ => unreachable!(),
    };

    Ok((rest, decoded_char))
}
