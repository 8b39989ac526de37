/*!

This is the long-form manual for `engagement_scoring` and the `engage` program.

## Input formats

Both inputs are tables with a header in the first row.

### Engagement data

One row per survey response. The following columns are required:
* `BUHR NAME`
* `Department`
* `BUHEAD NAME`

Every column whose name starts with `Q-` is a statement. The cells of a
statement should be numbers (typically a 1 to 5 scale). Blank cells are
ignored when computing the means. A statement column that contains any text
is not numeric and never gets a score.

```text
BUHR NAME,Department,BUHEAD NAME,Q-1,Q-2,Q-3
Ana,Sales,Carl,4,5,2
Ben,Sales,Carl,3,,1
```

### Action plan

Two columns: `Score` and `Action`. The `Score` column holds one of the labels
`Low`, `Medium` and `High` (case-sensitive).

```text
Score,Action
Low,Organize listening sessions with the team
Medium,Review the team rituals
High,Share the good practices
```

If a label appears several times, the first row is used. Other labels are
ignored.

## Selecting responses

A selector is a list of `field = value` conditions. A response is selected
when all the conditions hold. Values are compared exactly: `Sales` and
`sales` are different departments.

The `engage` program picks the first value of each of the three selector
fields, unless another value is given with `--select`.

## Scores and bands

The score of a statement is the mean of its values over the selected
responses. The score maps to a band:

| score            | band     |
|------------------|----------|
| 4.0 and above    | `High`   |
| 2.0 and below    | `Low`    |
| in between       | `Medium` |

## Statement numbers

The lowest statements view only looks at the statements `Q-1` to `Q-26`.
A statement whose name does not end with a number (for example `Q-abc`)
is left out of this view. The recommendations use every `Q-` statement.

## Configuration

The `engage` program accepts a configuration file in JSON:

```text
{
  "engagementFile": "engagement.xlsx",
  "actionPlanFile": "action_plan.xlsx",
  "inputType": "xlsx",
  "selectors": { "Department": "Sales" },
  "statementPrefix": "Q-",
  "statementRange": { "min": 1, "max": 26 },
  "count": 5
}
```

All the fields are optional. Paths are relative to the configuration file.
The command line flags take precedence over the values in the file.

 */
